//! Persisted record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapped per-file key material.
///
/// Each field is a self-contained envelope string
/// (`base64(nonce || ciphertext || tag)`) produced under the owner's master
/// key. Meaningless without it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileKeyEnvelope {
    /// Wrapped per-file content key.
    pub wrapped_key: String,
    /// Wrapped per-file content nonce.
    pub wrapped_iv: String,
}

/// One owner's record of a stored file.
///
/// `content_hash` is the only handle into the blob store; records from
/// different owners may share it under content-addressed deduplication.
/// Public files carry no key material.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub content_hash: String,
    pub folder_id: Option<String>,
    pub is_public: bool,
    pub extension: Option<String>,
    /// Wrapped key material; `None` for public files.
    pub envelope: Option<FileKeyEnvelope>,
    /// Metadata blob wrapped under the master key with its own envelope
    /// nonce, independent of the content key.
    pub encrypted_metadata: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl FileRecord {
    /// Creates a record with a fresh id and timestamps. Optional fields
    /// start empty.
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        content_hash: impl Into<String>,
        is_public: bool,
    ) -> Self {
        let name = name.into();
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner: owner.into(),
            extension: extension_of(&name),
            name,
            content_hash: content_hash.into(),
            folder_id: None,
            is_public,
            envelope: None,
            encrypted_metadata: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Marks the record as modified now.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

fn extension_of(name: &str) -> Option<String> {
    std::path::Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

/// A registered user: email plus the PHC-encoded login hash.
///
/// The login hash's embedded salt is independent of master-key derivation
/// and is never used for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}
