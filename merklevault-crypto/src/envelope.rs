//! Envelope encryption of short secrets under the master key.
//!
//! An envelope is `base64(nonce[12] || ciphertext || tag[16])`: a fresh
//! random nonce is generated per wrap and prepended, so the base64 string
//! is self-contained and the master key is the only input needed to open it.
//!
//! Every unwrap failure — bad base64, truncated input, tag mismatch, wrong
//! key — surfaces as `DecryptionFailed`. A caller holding a stale master key
//! and a caller holding corrupted data see the same error.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::key::MasterKey;

/// Wraps a short secret (a file key, a nonce, a metadata blob) under the
/// master key.
pub fn wrap(secret: &[u8], master_key: &MasterKey) -> CryptoResult<String> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(master_key.as_bytes()));

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), secret)
        .map_err(|e| CryptoError::Encryption(format!("envelope wrap failed: {e}")))?;

    let mut envelope = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    envelope.extend_from_slice(&nonce_bytes);
    envelope.extend_from_slice(&ciphertext);
    Ok(BASE64.encode(envelope))
}

/// Opens an envelope produced by [`wrap`].
pub fn unwrap(envelope: &str, master_key: &MasterKey) -> CryptoResult<Vec<u8>> {
    let bytes = BASE64
        .decode(envelope)
        .map_err(|_| CryptoError::DecryptionFailed)?;

    if bytes.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::DecryptionFailed);
    }

    let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
    let cipher = ChaCha20Poly1305::new(Key::from_slice(master_key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CryptoError::DecryptionFailed)
}
