//! In-memory master-key custody.
//!
//! One entry per owner, born at login, dead at logout, expiry, or process
//! exit. The map is the only shared mutable state in the vault core; all
//! per-owner operations are atomic under its write lock, and no cross-owner
//! coordination exists.
//!
//! Eviction happens twice over: any expired entry found by `get`/`has` is
//! removed on the spot, and a background sweeper clears entries of owners
//! who logged in once and never came back.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use merklevault_crypto::MasterKey;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::debug;

struct SessionEntry {
    master_key: MasterKey,
    expires_at: DateTime<Utc>,
}

/// Process-wide map from owner identity to their live master key.
///
/// Cloning the handle shares the underlying map.
#[derive(Clone)]
pub struct MasterKeySession {
    entries: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl MasterKeySession {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Stores a master key for an owner, displacing any previous entry.
    ///
    /// Re-login silently invalidates the prior session's key; the displaced
    /// key zeroizes on drop.
    pub async fn store(&self, owner_id: &str, key: MasterKey, expires_at: DateTime<Utc>) {
        let entry = SessionEntry {
            master_key: key,
            expires_at,
        };
        self.entries.write().await.insert(owner_id.to_string(), entry);
        debug!("stored master key for {owner_id}, expires at {expires_at}");
    }

    /// Returns the owner's master key while it is still live.
    ///
    /// An expired entry is evicted as a side effect, so a later [`has`]
    /// also answers false. Absence is the normal "session not established
    /// or expired" condition, not an error.
    ///
    /// [`has`]: MasterKeySession::has
    pub async fn get(&self, owner_id: &str) -> Option<MasterKey> {
        let now = Utc::now();

        // Fast path: live entry under the read lock.
        {
            let entries = self.entries.read().await;
            match entries.get(owner_id) {
                Some(entry) if now <= entry.expires_at => {
                    return Some(entry.master_key.clone());
                }
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: evict, re-checking under the write lock so a concurrent
        // re-login is never thrown away.
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(owner_id) {
            if now <= entry.expires_at {
                return Some(entry.master_key.clone());
            }
            entries.remove(owner_id);
            debug!("evicted expired master key for {owner_id}");
        }
        None
    }

    /// Expiry-aware presence check without handing out the key.
    pub async fn has(&self, owner_id: &str) -> bool {
        self.get(owner_id).await.is_some()
    }

    /// Explicit revocation (logout).
    pub async fn remove(&self, owner_id: &str) {
        if self.entries.write().await.remove(owner_id).is_some() {
            debug!("removed master key for {owner_id}");
        }
    }

    /// Evicts every expired entry, returning how many were removed.
    pub async fn evict_expired(&self) -> usize {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now <= entry.expires_at);
        before - entries.len()
    }

    /// Runs [`evict_expired`] on a fixed interval, independent of request
    /// traffic. The caller owns the handle and aborts it on shutdown.
    ///
    /// [`evict_expired`]: MasterKeySession::evict_expired
    pub fn spawn_sweeper(&self, period: std::time::Duration) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // The immediate first tick would sweep an empty map.
            interval.tick().await;
            loop {
                interval.tick().await;
                let evicted = session.evict_expired().await;
                if evicted > 0 {
                    debug!("session sweep evicted {evicted} expired master keys");
                }
            }
        })
    }

    /// Number of cached entries, expired or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MasterKeySession {
    fn default() -> Self {
        Self::new()
    }
}
