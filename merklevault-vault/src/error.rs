//! Vault error types.
//!
//! The boundary taxonomy consumed by request handlers. Lower-layer errors
//! are converted at this boundary so callers see one flat set of conditions:
//! everything that should end in "re-authenticate or file unavailable" is
//! `DecryptionFailed`, everything retryable is `StorageUnavailable`.

use merklevault_blobstore::BlobStoreError;
use merklevault_crypto::CryptoError;
use merklevault_storage::StorageError;
use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors that can occur in the vault core.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Malformed input, rejected before any work.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Unknown email or wrong password. Which of the two is never revealed.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email already registered: {0}")]
    EmailInUse(String),

    /// No live master key for this owner. Recoverable: re-login.
    #[error("session expired, re-authentication required")]
    SessionExpired,

    /// Wrong key, stale session key, or tampered data. Callers must treat
    /// all three identically.
    #[error("decryption failed (re-authenticate or file unavailable)")]
    DecryptionFailed,

    #[error("not found: {0}")]
    NotFound(String),

    /// Blob or metadata store unreachable. Retryable.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Internal crypto failure that is neither a bad key nor bad input.
    /// Should not reach users.
    #[error("crypto error: {0}")]
    Crypto(String),
}

impl From<CryptoError> for VaultError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::InvalidParameters(msg) => VaultError::InvalidParameters(msg),
            CryptoError::DecryptionFailed => VaultError::DecryptionFailed,
            other => VaultError::Crypto(other.to_string()),
        }
    }
}

impl From<StorageError> for VaultError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(what) => VaultError::NotFound(what),
            StorageError::AlreadyExists(what) => VaultError::EmailInUse(what),
            StorageError::Unavailable(msg) => VaultError::StorageUnavailable(msg),
        }
    }
}

impl From<BlobStoreError> for VaultError {
    fn from(e: BlobStoreError) -> Self {
        match e {
            BlobStoreError::NotFound(what) => VaultError::NotFound(what),
            BlobStoreError::Unavailable(msg) | BlobStoreError::Backend(msg) => {
                VaultError::StorageUnavailable(msg)
            }
        }
    }
}
