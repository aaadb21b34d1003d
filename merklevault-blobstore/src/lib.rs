//! Content-addressed blob storage for MerkleVault.
//!
//! The vault never names blobs: the retrieval handle is the hash of the
//! content itself, so identical bytes from different owners collapse to a
//! single stored blob. This crate defines the [`BlobStore`] trait seam, an
//! in-memory implementation for tests and embedded use, and an adapter for
//! an IPFS node's HTTP API.
//!
//! `unpin` and `garbage_collect` are best-effort operations: callers in the
//! deletion path log and swallow their failures, since they affect storage
//! efficiency rather than correctness.

mod error;
mod ipfs;
mod store;

pub use error::{BlobStoreError, BlobStoreResult};
pub use ipfs::{IpfsBlobStore, IpfsConfig};
pub use store::{BlobStore, MemoryBlobStore};
