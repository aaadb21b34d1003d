//! Retry behavior at the workflow boundary, driven by a blob store that
//! fails with transient outages on demand.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use merklevault_blobstore::{BlobStore, BlobStoreError, BlobStoreResult, MemoryBlobStore};
use merklevault_crypto::MasterKey;
use merklevault_storage::{FileMetadataStore, MemoryMetadataStore};
use merklevault_vault::{FileVault, MasterKeySession, RetryPolicy, UploadOptions, VaultError};

/// Wraps a [`MemoryBlobStore`], failing the next N put/get calls with
/// `Unavailable` and counting every attempt.
struct FlakyBlobStore {
    inner: MemoryBlobStore,
    failures_remaining: AtomicU32,
    calls: AtomicU32,
}

impl FlakyBlobStore {
    fn new(failures: u32) -> Self {
        Self {
            inner: MemoryBlobStore::new(),
            failures_remaining: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        }
    }

    fn fail_next(&self, failures: u32) {
        self.failures_remaining.store(failures, Ordering::SeqCst);
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn maybe_fail(&self) -> BlobStoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(BlobStoreError::Unavailable("simulated outage".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FlakyBlobStore {
    async fn put(&self, bytes: &[u8]) -> BlobStoreResult<String> {
        self.maybe_fail()?;
        self.inner.put(bytes).await
    }

    async fn get(&self, content_hash: &str) -> BlobStoreResult<Vec<u8>> {
        self.maybe_fail()?;
        self.inner.get(content_hash).await
    }

    async fn unpin(&self, content_hash: &str) -> BlobStoreResult<()> {
        self.inner.unpin(content_hash).await
    }

    async fn remove_block(&self, content_hash: &str) -> BlobStoreResult<()> {
        self.inner.remove_block(content_hash).await
    }

    async fn garbage_collect(&self) -> BlobStoreResult<()> {
        self.inner.garbage_collect().await
    }
}

struct Harness {
    vault: FileVault,
    session: MasterKeySession,
    metadata: Arc<MemoryMetadataStore>,
    blobs: Arc<FlakyBlobStore>,
}

fn harness(failures: u32, max_attempts: u32) -> Harness {
    let session = MasterKeySession::new();
    let metadata = Arc::new(MemoryMetadataStore::new());
    let blobs = Arc::new(FlakyBlobStore::new(failures));
    let vault = FileVault::new(
        session.clone(),
        metadata.clone(),
        blobs.clone(),
        RetryPolicy::new(max_attempts, Duration::from_millis(1)),
    );
    Harness {
        vault,
        session,
        metadata,
        blobs,
    }
}

async fn establish_session(session: &MasterKeySession, owner: &str) {
    session
        .store(
            owner,
            MasterKey::from_bytes([0x42; 32]),
            Utc::now() + chrono::Duration::hours(1),
        )
        .await;
}

#[tokio::test]
async fn upload_survives_a_transient_outage() {
    let h = harness(2, 3);
    establish_session(&h.session, "alice").await;

    let record = h
        .vault
        .upload("alice", "a.txt", b"payload", UploadOptions::default())
        .await
        .unwrap();

    assert_eq!(h.blobs.calls(), 3, "two failures then one success");
    assert!(h.blobs.inner.contains(&record.content_hash).await);
}

#[tokio::test]
async fn exhausted_retries_surface_storage_unavailable() {
    let h = harness(10, 3);
    establish_session(&h.session, "alice").await;

    let err = h
        .vault
        .upload("alice", "a.txt", b"payload", UploadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::StorageUnavailable(_)));
    assert_eq!(h.blobs.calls(), 3, "bounded attempts, not an infinite loop");

    // The put never succeeded, so no record was persisted either: the
    // wrap → put → insert ordering cannot leave a dangling record.
    assert!(h.metadata.list_by_owner("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn download_retries_the_blob_fetch() {
    let h = harness(0, 3);
    establish_session(&h.session, "alice").await;

    h.vault
        .upload("alice", "a.txt", b"payload", UploadOptions::default())
        .await
        .unwrap();

    h.blobs.fail_next(2);
    let downloaded = h.vault.download("alice", "a.txt").await.unwrap();
    assert_eq!(downloaded, b"payload");
}

#[tokio::test]
async fn deterministic_errors_are_not_retried() {
    let h = harness(0, 3);
    establish_session(&h.session, "alice").await;

    // A record whose blob is gone: the NotFound is permanent and should
    // burn exactly one attempt.
    h.vault
        .upload("alice", "a.txt", b"payload", UploadOptions::default())
        .await
        .unwrap();
    let record = h.metadata.get_by_name("alice", "a.txt").await.unwrap().unwrap();
    h.blobs.inner.unpin(&record.content_hash).await.unwrap();
    h.blobs.inner.remove_block(&record.content_hash).await.unwrap();

    let calls_before = h.blobs.calls();
    let err = h.vault.download("alice", "a.txt").await.unwrap_err();
    assert!(matches!(err, VaultError::NotFound(_)));
    assert_eq!(h.blobs.calls() - calls_before, 1);
}
