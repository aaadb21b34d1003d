//! Blob store error types.

use thiserror::Error;

/// Result type for blob store operations.
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;

/// Errors that can occur against the content-addressed store.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob not found: {0}")]
    NotFound(String),

    /// Node unreachable or request timed out. Retryable.
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    /// The node answered, but not with what the protocol promises.
    #[error("blob store backend error: {0}")]
    Backend(String),
}

impl From<reqwest::Error> for BlobStoreError {
    fn from(e: reqwest::Error) -> Self {
        // Transport failures and timeouts are transient; a response the
        // client could not decode is a backend fault.
        if e.is_timeout() || e.is_connect() || e.is_request() {
            BlobStoreError::Unavailable(e.to_string())
        } else {
            BlobStoreError::Backend(e.to_string())
        }
    }
}
