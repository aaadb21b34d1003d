//! Metadata store interfaces for MerkleVault.
//!
//! The vault treats metadata persistence as an external collaborator:
//! file records are documents keyed by id and by `(owner, name)`, user
//! records by email. This crate defines the trait seams plus in-memory
//! implementations used by tests and embedded deployments.
//!
//! The one query with real semantics is
//! [`FileMetadataStore::count_by_hash_excluding_owner`]: under
//! content-addressed deduplication, multiple owners' records may point at
//! the same `content_hash`, and physical blob deletion is only safe when
//! no *other* owner still references it.

mod error;
mod files;
mod types;
mod users;

pub use error::{StorageError, StorageResult};
pub use files::{FileMetadataStore, MemoryMetadataStore};
pub use types::{FileKeyEnvelope, FileRecord, UserRecord};
pub use users::{MemoryUserStore, UserStore};
