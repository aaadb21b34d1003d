//! Shared wiring for vault integration tests: a full vault over the
//! in-memory stores, with direct handles kept for state assertions.

use std::sync::Arc;

use merklevault_blobstore::MemoryBlobStore;
use merklevault_storage::{MemoryMetadataStore, MemoryUserStore};
use merklevault_vault::{Authenticator, FileVault, MasterKeySession, VaultConfig};

pub struct TestVault {
    pub auth: Authenticator,
    pub vault: FileVault,
    pub session: MasterKeySession,
    pub metadata: Arc<MemoryMetadataStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

pub fn test_config() -> VaultConfig {
    VaultConfig {
        deployment_salt: "test-deployment-salt".into(),
        ..VaultConfig::default()
    }
}

/// Opt-in log output for debugging a failing test: `TEST_LOG=1 cargo test`.
fn init_tracing() {
    if std::env::var("TEST_LOG").is_ok() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }
}

pub fn vault_with_config(config: VaultConfig) -> TestVault {
    init_tracing();
    let session = MasterKeySession::new();
    let metadata = Arc::new(MemoryMetadataStore::new());
    let blobs = Arc::new(MemoryBlobStore::new());

    let auth = Authenticator::new(
        Arc::new(MemoryUserStore::new()),
        session.clone(),
        config.clone(),
    );
    let vault = FileVault::new(
        session.clone(),
        metadata.clone(),
        blobs.clone(),
        config.retry_policy(),
    );

    TestVault {
        auth,
        vault,
        session,
        metadata,
        blobs,
    }
}

pub fn test_vault() -> TestVault {
    vault_with_config(test_config())
}
