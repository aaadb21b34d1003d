//! Master-key custody and the file crypto workflow.
//!
//! This crate ties the vault core together: login derives a per-user
//! master key and parks it in the process-wide [`MasterKeySession`] with a
//! bounded lifetime; uploads generate a fresh per-file key, encrypt the
//! content, and persist only the wrapped key material; deletion consults
//! [`DedupGuard`] so a shared content-addressed blob outlives any single
//! owner's record.
//!
//! The external stores are trait objects — the vault threads explicit
//! owner identities into every call and assumes no ambient authentication
//! context.
//!
//! # Wiring
//!
//! ```no_run
//! use std::sync::Arc;
//! use merklevault_blobstore::MemoryBlobStore;
//! use merklevault_storage::{MemoryMetadataStore, MemoryUserStore};
//! use merklevault_vault::{Authenticator, FileVault, MasterKeySession, VaultConfig};
//!
//! let config = VaultConfig::default();
//! let session = MasterKeySession::new();
//! let sweeper = session.spawn_sweeper(config.sweep_interval());
//!
//! let auth = Authenticator::new(Arc::new(MemoryUserStore::new()), session.clone(), config.clone());
//! let vault = FileVault::new(
//!     session,
//!     Arc::new(MemoryMetadataStore::new()),
//!     Arc::new(MemoryBlobStore::new()),
//!     config.retry_policy(),
//! );
//! # drop((auth, vault, sweeper));
//! ```

mod auth;
mod config;
mod dedup;
mod error;
mod retry;
mod session;
mod workflow;

pub use auth::Authenticator;
pub use config::VaultConfig;
pub use dedup::DedupGuard;
pub use error::{VaultError, VaultResult};
pub use retry::RetryPolicy;
pub use session::MasterKeySession;
pub use workflow::{FileVault, UploadOptions};
