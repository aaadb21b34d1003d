//! File metadata store: trait seam plus the in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::types::FileRecord;

/// Document storage for [`FileRecord`]s, keyed by id and by `(owner, name)`.
///
/// Implementations must be safe for concurrent use from many request tasks.
#[async_trait]
pub trait FileMetadataStore: Send + Sync {
    async fn insert(&self, record: FileRecord) -> StorageResult<()>;

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<FileRecord>>;

    async fn get_by_name(&self, owner: &str, name: &str) -> StorageResult<Option<FileRecord>>;

    async fn list_by_owner(&self, owner: &str) -> StorageResult<Vec<FileRecord>>;

    async fn list_by_folder(&self, owner: &str, folder_id: &str) -> StorageResult<Vec<FileRecord>>;

    /// Case-insensitive substring match over plaintext names. Encrypted
    /// metadata cannot be searched server-side.
    async fn search_by_name(&self, owner: &str, query: &str) -> StorageResult<Vec<FileRecord>>;

    /// Replaces the record with the same id.
    async fn update(&self, record: FileRecord) -> StorageResult<()>;

    async fn remove(&self, id: &str) -> StorageResult<()>;

    /// Counts records referencing `content_hash` owned by someone other
    /// than `owner`. The deduplication-safety query: physical blob deletion
    /// is allowed only when this returns zero.
    async fn count_by_hash_excluding_owner(
        &self,
        content_hash: &str,
        owner: &str,
    ) -> StorageResult<u64>;
}

/// In-memory [`FileMetadataStore`] for tests and embedded use.
#[derive(Clone, Default)]
pub struct MemoryMetadataStore {
    records: Arc<RwLock<HashMap<String, FileRecord>>>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileMetadataStore for MemoryMetadataStore {
    async fn insert(&self, record: FileRecord) -> StorageResult<()> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> StorageResult<Option<FileRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn get_by_name(&self, owner: &str, name: &str) -> StorageResult<Option<FileRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .find(|r| r.owner == owner && r.name == name)
            .cloned())
    }

    async fn list_by_owner(&self, owner: &str) -> StorageResult<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner == owner)
            .cloned()
            .collect();
        files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(files)
    }

    async fn list_by_folder(&self, owner: &str, folder_id: &str) -> StorageResult<Vec<FileRecord>> {
        let mut files: Vec<FileRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner == owner && r.folder_id.as_deref() == Some(folder_id))
            .cloned()
            .collect();
        files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
        Ok(files)
    }

    async fn search_by_name(&self, owner: &str, query: &str) -> StorageResult<Vec<FileRecord>> {
        let needle = query.to_lowercase();
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.owner == owner && r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn update(&self, record: FileRecord) -> StorageResult<()> {
        let mut records = self.records.write().await;
        if !records.contains_key(&record.id) {
            return Err(StorageError::NotFound(record.id));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn remove(&self, id: &str) -> StorageResult<()> {
        self.records
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(id.to_string()))
    }

    async fn count_by_hash_excluding_owner(
        &self,
        content_hash: &str,
        owner: &str,
    ) -> StorageResult<u64> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.content_hash == content_hash && r.owner != owner)
            .count() as u64)
    }
}
