//! Symmetric key types.
//!
//! Both key types are 256-bit ChaCha20-Poly1305 keys that live only in
//! volatile memory and zeroize on drop (clones included).

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Key size in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Per-user master key derived from the login password.
///
/// Used only to wrap and unwrap per-file keys; never persisted.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_SIZE]);

impl MasterKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Builds a key from a slice, enforcing the exact AEAD key length.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(checked_key_slice(bytes)?);
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Random per-file content key.
///
/// Born at upload, persisted only in wrapped form, reconstructed at
/// download by unwrapping with the owner's master key.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct FileKey([u8; KEY_SIZE]);

impl FileKey {
    /// Generates a fresh random file key.
    pub fn generate() -> Self {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let mut arr = [0u8; KEY_SIZE];
        arr.copy_from_slice(checked_key_slice(bytes)?);
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FileKey(..)")
    }
}

fn checked_key_slice(bytes: &[u8]) -> CryptoResult<&[u8]> {
    if bytes.len() != KEY_SIZE {
        return Err(CryptoError::InvalidKey {
            expected: KEY_SIZE,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
