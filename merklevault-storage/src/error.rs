//! Metadata store error types.

use thiserror::Error;

/// Result type for metadata store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur against the metadata store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    /// Store unreachable or timed out. Retryable.
    #[error("metadata store unavailable: {0}")]
    Unavailable(String),
}
