//! Blob store trait seam plus the in-memory implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::error::{BlobStoreError, BlobStoreResult};

/// A content-addressed blob service.
///
/// `put` returns the content hash that `get`, `unpin`, and `remove_block`
/// accept as the handle. Putting identical bytes twice yields the same hash
/// and stores one blob.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores (and pins) `bytes`, returning their content hash.
    async fn put(&self, bytes: &[u8]) -> BlobStoreResult<String>;

    async fn get(&self, content_hash: &str) -> BlobStoreResult<Vec<u8>>;

    /// Releases the pin so the blob becomes collectable.
    async fn unpin(&self, content_hash: &str) -> BlobStoreResult<()>;

    /// Physically removes the blob. Fails while the blob is still pinned.
    async fn remove_block(&self, content_hash: &str) -> BlobStoreResult<()>;

    /// Sweeps unpinned blobs. Best-effort.
    async fn garbage_collect(&self) -> BlobStoreResult<()>;
}

#[derive(Default)]
struct MemoryState {
    blobs: HashMap<String, Vec<u8>>,
    pins: HashSet<String>,
}

/// In-memory [`BlobStore`] for tests and embedded use.
///
/// Content-addressed by the hex SHA-256 of the stored bytes, with pin
/// semantics matching an IPFS node: `remove_block` refuses pinned blobs and
/// `garbage_collect` sweeps everything unpinned.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if a blob with this hash is physically present.
    pub async fn contains(&self, content_hash: &str) -> bool {
        self.state.read().await.blobs.contains_key(content_hash)
    }

    /// Number of distinct blobs stored.
    pub async fn len(&self) -> usize {
        self.state.read().await.blobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.blobs.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: &[u8]) -> BlobStoreResult<String> {
        let hash = hex::encode(Sha256::digest(bytes));
        let mut state = self.state.write().await;
        state.blobs.entry(hash.clone()).or_insert_with(|| bytes.to_vec());
        state.pins.insert(hash.clone());
        Ok(hash)
    }

    async fn get(&self, content_hash: &str) -> BlobStoreResult<Vec<u8>> {
        self.state
            .read()
            .await
            .blobs
            .get(content_hash)
            .cloned()
            .ok_or_else(|| BlobStoreError::NotFound(content_hash.to_string()))
    }

    async fn unpin(&self, content_hash: &str) -> BlobStoreResult<()> {
        self.state.write().await.pins.remove(content_hash);
        Ok(())
    }

    async fn remove_block(&self, content_hash: &str) -> BlobStoreResult<()> {
        let mut state = self.state.write().await;
        if state.pins.contains(content_hash) {
            return Err(BlobStoreError::Backend(format!(
                "block {content_hash} is pinned"
            )));
        }
        state
            .blobs
            .remove(content_hash)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::NotFound(content_hash.to_string()))
    }

    async fn garbage_collect(&self) -> BlobStoreResult<()> {
        let mut state = self.state.write().await;
        let pinned = state.pins.clone();
        state.blobs.retain(|hash, _| pinned.contains(hash));
        Ok(())
    }
}
