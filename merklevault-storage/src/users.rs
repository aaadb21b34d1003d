//! User store: trait seam plus the in-memory implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{StorageError, StorageResult};
use crate::types::UserRecord;

/// Storage for registered users, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Rejects a duplicate email with `AlreadyExists`.
    async fn insert(&self, user: UserRecord) -> StorageResult<()>;

    async fn get_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>>;
}

/// In-memory [`UserStore`] for tests and embedded use.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: UserRecord) -> StorageResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StorageError::AlreadyExists(user.email));
        }
        users.insert(user.email.clone(), user);
        Ok(())
    }

    async fn get_by_email(&self, email: &str) -> StorageResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(email).cloned())
    }
}
