//! Reference counting before physical blob deletion.

use std::sync::Arc;

use merklevault_storage::FileMetadataStore;
use tracing::debug;

use crate::error::VaultResult;

/// Guards shared blobs against premature deletion.
///
/// Content addressing collapses identical bytes from different owners into
/// one blob; deleting one owner's record must not destroy it while others
/// still reference it. The check is advisory, not transactional: a
/// concurrent upload between count and delete can orphan a blob, which is
/// the accepted outcome — leaked storage over destroyed shared data. The
/// node's own garbage collection reconciles orphans.
#[derive(Clone)]
pub struct DedupGuard {
    metadata: Arc<dyn FileMetadataStore>,
}

impl DedupGuard {
    pub fn new(metadata: Arc<dyn FileMetadataStore>) -> Self {
        Self { metadata }
    }

    /// True when no owner other than `requesting_owner` references
    /// `content_hash`, i.e. physical deletion is provably safe.
    pub async fn should_physically_delete(
        &self,
        content_hash: &str,
        requesting_owner: &str,
    ) -> VaultResult<bool> {
        let others = self
            .metadata
            .count_by_hash_excluding_owner(content_hash, requesting_owner)
            .await?;
        debug!("{others} other owner(s) reference {content_hash}");
        Ok(others == 0)
    }
}
