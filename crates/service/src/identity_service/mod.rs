//! Identity resolution over the contact store.

use std::sync::Arc;

use contact_identity_core::{ContactAttributes, IdentityView};
use contact_identity_storage::StorageBackend;
use contact_identity_storage::traits::{ContactStore, ContactTransaction};

use crate::ServiceError;

mod integrity;
mod linking;

pub use integrity::{IntegrityViolation, ViolationKind};

pub struct IdentityService {
    storage: Arc<StorageBackend>,
}

impl IdentityService {
    #[must_use]
    pub const fn new(storage: Arc<StorageBackend>) -> Self {
        Self { storage }
    }

    /// Resolve `attrs` to its identity, creating, linking or merging contacts
    /// as needed. Runs in one transaction; nothing persists on error.
    pub async fn identify(&self, attrs: &ContactAttributes) -> Result<IdentityView, ServiceError> {
        let mut tx = self.storage.begin().await?;
        match linking::resolve(&mut tx, attrs).await {
            Ok(view) => {
                tx.commit().await?;
                Ok(view)
            },
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "identify rollback failed");
                }
                Err(err)
            },
        }
    }

    /// Hard reset of all identity data. Returns the number of removed contacts.
    pub async fn clear_all(&self) -> Result<u64, ServiceError> {
        let removed = self.storage.clear_all().await?;
        tracing::info!(removed, backend = self.storage.kind(), "cleared all contacts");
        Ok(removed)
    }

    /// Read-only audit of the stored link graph.
    pub async fn verify_integrity(&self) -> Result<Vec<IntegrityViolation>, ServiceError> {
        let mut tx = self.storage.begin().await?;
        let contacts = tx.list_all().await;
        tx.rollback().await?;
        Ok(integrity::audit(&contacts?))
    }
}
