//! Vault configuration.

use merklevault_crypto::DEFAULT_KDF_ITERATIONS;
use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Configuration for the vault core.
///
/// The KDF iteration count and the AEAD algorithm are fixed for a given
/// deployment: changing either invalidates every previously wrapped
/// envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Deployment-wide secondary salt mixed into master-key derivation.
    pub deployment_salt: String,

    /// PBKDF2 iteration count for master-key derivation.
    pub kdf_iterations: u32,

    /// Master-key session lifetime in seconds (matches the login-token
    /// lifetime).
    pub session_ttl_secs: i64,

    /// Interval between background session sweeps, in seconds.
    pub sweep_interval_secs: u64,

    /// Attempts for retryable blob-store calls.
    pub retry_max_attempts: u32,

    /// Base delay between retries in milliseconds (doubles per attempt).
    pub retry_base_delay_ms: u64,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            deployment_salt: String::new(),
            kdf_iterations: DEFAULT_KDF_ITERATIONS,
            session_ttl_secs: 2 * 60 * 60, // matches the 120-minute login token
            sweep_interval_secs: 5 * 60,
            retry_max_attempts: 3,
            retry_base_delay_ms: 100,
        }
    }
}

impl VaultConfig {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_max_attempts,
            std::time::Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}
