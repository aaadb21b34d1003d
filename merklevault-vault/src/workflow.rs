//! File upload, download, and deletion orchestration.
//!
//! Upload ordering is the crash-safety contract: every wrap happens before
//! any store write, the ciphertext lands in the blob store before the record
//! is persisted. A failure between those two leaves an orphaned blob the
//! node's garbage collection can reclaim, never a record pointing at bytes
//! that were never written.

use std::sync::Arc;

use merklevault_blobstore::BlobStore;
use merklevault_crypto::{envelope, generate_nonce, open, seal, FileKey, MasterKey, NONCE_SIZE};
use merklevault_storage::{FileKeyEnvelope, FileMetadataStore, FileRecord};
use tracing::{debug, error, warn};

use crate::dedup::DedupGuard;
use crate::error::{VaultError, VaultResult};
use crate::retry::RetryPolicy;
use crate::session::MasterKeySession;

/// Per-upload knobs. Defaults to a private file with no folder or metadata.
#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    /// Public files are stored as plaintext and carry no key material.
    pub is_public: bool,
    pub folder_id: Option<String>,
    /// Metadata to wrap under the owner's master key, independent of the
    /// content key.
    pub metadata: Option<String>,
}

/// Orchestrates the per-file crypto workflow against the session cache,
/// the metadata store, and the blob store.
pub struct FileVault {
    session: MasterKeySession,
    metadata: Arc<dyn FileMetadataStore>,
    blobs: Arc<dyn BlobStore>,
    dedup: DedupGuard,
    retry: RetryPolicy,
}

impl FileVault {
    pub fn new(
        session: MasterKeySession,
        metadata: Arc<dyn FileMetadataStore>,
        blobs: Arc<dyn BlobStore>,
        retry: RetryPolicy,
    ) -> Self {
        let dedup = DedupGuard::new(Arc::clone(&metadata));
        Self {
            session,
            metadata,
            blobs,
            dedup,
            retry,
        }
    }

    /// Stores a file for `owner`, returning the persisted record.
    ///
    /// Private uploads require a live master-key session and fail with
    /// `SessionExpired` otherwise — the vault never degrades to storing
    /// private content unencrypted.
    pub async fn upload(
        &self,
        owner: &str,
        name: &str,
        bytes: &[u8],
        options: UploadOptions,
    ) -> VaultResult<FileRecord> {
        if options.is_public {
            return self.upload_public(owner, name, bytes, options).await;
        }

        let master = self
            .session
            .get(owner)
            .await
            .ok_or(VaultError::SessionExpired)?;

        // Wrap everything before the first store write.
        let file_key = FileKey::generate();
        let nonce = generate_nonce();
        let ciphertext = seal(&file_key, &nonce, bytes)?;

        let wrapped = FileKeyEnvelope {
            wrapped_key: envelope::wrap(file_key.as_bytes(), &master)?,
            wrapped_iv: envelope::wrap(&nonce, &master)?,
        };
        let encrypted_metadata = options
            .metadata
            .as_deref()
            .map(|m| envelope::wrap(m.as_bytes(), &master))
            .transpose()?;

        let content_hash = self
            .retry
            .run("blob put", || self.blobs.put(&ciphertext))
            .await?;

        let mut record = FileRecord::new(owner, name, content_hash, false);
        record.folder_id = options.folder_id;
        record.envelope = Some(wrapped);
        record.encrypted_metadata = encrypted_metadata;
        self.metadata.insert(record.clone()).await?;

        debug!(
            "stored private file {name} for {owner} ({} bytes ciphertext)",
            ciphertext.len()
        );
        Ok(record)
    }

    async fn upload_public(
        &self,
        owner: &str,
        name: &str,
        bytes: &[u8],
        options: UploadOptions,
    ) -> VaultResult<FileRecord> {
        if options.metadata.is_some() {
            return Err(VaultError::InvalidParameters(
                "public files cannot carry encrypted metadata".into(),
            ));
        }

        let content_hash = self
            .retry
            .run("blob put", || self.blobs.put(bytes))
            .await?;

        let mut record = FileRecord::new(owner, name, content_hash, true);
        record.folder_id = options.folder_id;
        self.metadata.insert(record.clone()).await?;

        debug!("stored public file {name} for {owner} ({} bytes)", bytes.len());
        Ok(record)
    }

    /// Fetches and, for private files, decrypts a file.
    ///
    /// Every private-path failure that stems from key material — stale
    /// session key, tampered envelope, malformed record — is the uniform
    /// `DecryptionFailed`; there is never partially decrypted output.
    pub async fn download(&self, owner: &str, name: &str) -> VaultResult<Vec<u8>> {
        let record = self
            .metadata
            .get_by_name(owner, name)
            .await?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        let stored = self
            .retry
            .run("blob get", || self.blobs.get(&record.content_hash))
            .await?;

        if record.is_public {
            return Ok(stored);
        }

        let master = self
            .session
            .get(owner)
            .await
            .ok_or(VaultError::SessionExpired)?;

        let (file_key, nonce) = Self::unwrap_envelope(&record, &master)?;
        let plaintext = open(&file_key, &nonce, &stored)?;
        debug!("decrypted file {name} for {owner} ({} bytes)", plaintext.len());
        Ok(plaintext)
    }

    /// Recovers the per-file key and nonce from a private record.
    fn unwrap_envelope(
        record: &FileRecord,
        master: &MasterKey,
    ) -> VaultResult<(FileKey, [u8; NONCE_SIZE])> {
        // A private record without an envelope is as unreadable as one
        // wrapped under a lost key.
        let wrapped = record.envelope.as_ref().ok_or(VaultError::DecryptionFailed)?;

        let key_bytes = envelope::unwrap(&wrapped.wrapped_key, master)?;
        let file_key = FileKey::from_slice(&key_bytes).map_err(|_| VaultError::DecryptionFailed)?;

        let nonce_bytes = envelope::unwrap(&wrapped.wrapped_iv, master)?;
        let nonce: [u8; NONCE_SIZE] = nonce_bytes
            .as_slice()
            .try_into()
            .map_err(|_| VaultError::DecryptionFailed)?;

        Ok((file_key, nonce))
    }

    /// Returns the file's metadata, unwrapped under the current master key.
    pub async fn read_metadata(&self, owner: &str, name: &str) -> VaultResult<Option<String>> {
        let record = self
            .metadata
            .get_by_name(owner, name)
            .await?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        let Some(wrapped) = record.encrypted_metadata.as_deref() else {
            return Ok(None);
        };

        let master = self
            .session
            .get(owner)
            .await
            .ok_or(VaultError::SessionExpired)?;

        let bytes = envelope::unwrap(wrapped, &master)?;
        let metadata = String::from_utf8(bytes).map_err(|_| VaultError::DecryptionFailed)?;
        Ok(Some(metadata))
    }

    /// Replaces the file's metadata, re-wrapped with a fresh envelope nonce
    /// independent of the content key.
    pub async fn update_metadata(&self, owner: &str, name: &str, metadata: &str) -> VaultResult<()> {
        let mut record = self
            .metadata
            .get_by_name(owner, name)
            .await?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        if record.is_public {
            return Err(VaultError::InvalidParameters(
                "public files cannot carry encrypted metadata".into(),
            ));
        }

        let master = self
            .session
            .get(owner)
            .await
            .ok_or(VaultError::SessionExpired)?;

        record.encrypted_metadata = Some(envelope::wrap(metadata.as_bytes(), &master)?);
        record.touch();
        self.metadata.update(record).await?;
        Ok(())
    }

    /// Moves the file to another folder (or to the root with `None`).
    pub async fn move_file(
        &self,
        owner: &str,
        name: &str,
        folder_id: Option<String>,
    ) -> VaultResult<()> {
        let mut record = self
            .metadata
            .get_by_name(owner, name)
            .await?
            .ok_or_else(|| VaultError::NotFound(name.to_string()))?;

        record.folder_id = folder_id;
        record.touch();
        self.metadata.update(record).await?;
        Ok(())
    }

    pub async fn list_files(&self, owner: &str) -> VaultResult<Vec<FileRecord>> {
        Ok(self.metadata.list_by_owner(owner).await?)
    }

    pub async fn list_folder(&self, owner: &str, folder_id: &str) -> VaultResult<Vec<FileRecord>> {
        Ok(self.metadata.list_by_folder(owner, folder_id).await?)
    }

    /// Case-insensitive search over plaintext names.
    pub async fn search(&self, owner: &str, query: &str) -> VaultResult<Vec<FileRecord>> {
        Ok(self.metadata.search_by_name(owner, query).await?)
    }

    /// Deletes the owner's record and, when no other owner references the
    /// same content, the backing blob.
    ///
    /// The record row always goes. Physical cleanup is best-effort: unpin,
    /// block removal, and garbage collection affect storage efficiency,
    /// not correctness, so their failures are logged and swallowed.
    pub async fn delete(&self, owner: &str, id: &str) -> VaultResult<()> {
        let record = self
            .metadata
            .get_by_id(id)
            .await?
            .ok_or_else(|| VaultError::NotFound(id.to_string()))?;

        // Someone else's file is indistinguishable from a missing one.
        if record.owner != owner {
            return Err(VaultError::NotFound(id.to_string()));
        }

        let last_reference = self
            .dedup
            .should_physically_delete(&record.content_hash, owner)
            .await?;

        self.metadata.remove(id).await?;

        if !last_reference {
            debug!(
                "kept blob {} after deleting record {id}: still referenced",
                record.content_hash
            );
            return Ok(());
        }

        if let Err(e) = self.blobs.unpin(&record.content_hash).await {
            warn!("unpin of {} failed: {e}", record.content_hash);
        }
        if let Err(e) = self.blobs.remove_block(&record.content_hash).await {
            error!("block removal of {} failed: {e}", record.content_hash);
        }
        if let Err(e) = self.blobs.garbage_collect().await {
            warn!("garbage collection failed: {e}");
        }

        debug!("deleted record {id} and blob {}", record.content_hash);
        Ok(())
    }
}
