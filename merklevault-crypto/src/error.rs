//! Crypto error types.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in key derivation and envelope encryption.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Malformed derivation input. Rejected before any stretching work.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Wrong key length for the AEAD. A programming error, not user input.
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKey { expected: usize, actual: usize },

    /// Authentication tag mismatch: wrong key or tampered data.
    /// Callers must not distinguish the two cases.
    #[error("decryption failed (wrong key or tampered data)")]
    DecryptionFailed,

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("password hash error: {0}")]
    PasswordHash(String),
}
