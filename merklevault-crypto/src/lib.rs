//! Encryption layer for MerkleVault.
//!
//! Provides per-file envelope encryption using:
//! - PBKDF2-HMAC-SHA256 for master-key derivation from the login password
//! - ChaCha20-Poly1305 for authenticated encryption
//! - Secure key management with zeroization
//!
//! # Architecture
//!
//! The encryption uses a two-tier key system:
//!
//! 1. **Master Key**: Derived from the user's password at login.
//!    This key is never stored - it's re-derived each time the user logs in
//!    and held only in the in-memory session cache.
//!
//! 2. **File Key**: A random key generated for each uploaded file.
//!    The file key (and its nonce) are wrapped with the master key and
//!    persisted alongside the file metadata.
//!
//! This architecture allows:
//! - Changing the password without re-encrypting all file content
//! - Content-addressed deduplication independent of key material
//! - One compromised file key never affecting other files

mod cipher;
mod error;
mod key;
pub mod envelope;
pub mod kdf;

pub use cipher::{generate_nonce, open, seal, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use kdf::{
    derive_master_key, hash_login_password, verify_login_password, DEFAULT_KDF_ITERATIONS,
    LOGIN_HASH_ITERATIONS, MIN_KDF_ITERATIONS,
};
pub use key::{FileKey, MasterKey, KEY_SIZE};
