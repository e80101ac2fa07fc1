//! Typed error enum for the service layer.

use contact_identity_storage::StorageError;
use thiserror::Error;

/// Failure of an identity operation. The transaction has been rolled back.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (DB, not found, duplicate, etc.).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// Stored link graph is inconsistent; not auto-repaired.
    #[error("integrity: {0}")]
    Integrity(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Integrity(_) => false,
        }
    }

    /// Whether a concurrent writer created the same attribute pair first.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_duplicate())
    }

    pub(crate) fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }
}
