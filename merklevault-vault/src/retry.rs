//! Bounded retry for transient store failures.
//!
//! Applied at the workflow boundary only: the cipher layer never retries,
//! and only `Unavailable` is worth a second attempt — every other error is
//! deterministic.

use std::future::Future;
use std::time::Duration;

use merklevault_blobstore::{BlobStoreError, BlobStoreResult};
use tracing::warn;

/// Exponential backoff policy for retryable blob-store calls.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay before retrying after `attempt` failures (doubles each time).
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Runs `op`, retrying while it fails with `Unavailable`.
    pub async fn run<T, F, Fut>(&self, what: &str, op: F) -> BlobStoreResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = BlobStoreResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(BlobStoreError::Unavailable(msg)) if attempt + 1 < self.max_attempts => {
                    let delay = self.delay_for_attempt(attempt);
                    warn!("{what} unavailable ({msg}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(100))
    }
}
