//! Storage backend trait abstraction
//!
//! A store hands out transactions; every read and write of a request goes
//! through one transaction and becomes visible only on `commit`. Every query
//! excludes soft-deleted rows.

use async_trait::async_trait;
use contact_identity_core::{Contact, ContactId, ContactUpdate, NewContact};

use crate::StorageError;

/// Entry point to a contact store.
#[async_trait]
pub trait ContactStore: Send + Sync {
    type Transaction: ContactTransaction;

    /// Open a transaction.
    async fn begin(&self) -> Result<Self::Transaction, StorageError>;

    /// Remove every contact, soft-deleted ones included, and restart ids.
    /// Returns the number of removed rows. Administrative only.
    async fn clear_all(&self) -> Result<u64, StorageError>;
}

/// Contact operations scoped to one open transaction.
///
/// Dropping a transaction without calling `commit` discards its writes.
#[async_trait]
pub trait ContactTransaction: Send {
    /// Contacts whose email equals `email` OR whose phone equals `phone_number`,
    /// oldest first. An absent argument contributes no predicate; both absent
    /// matches nothing.
    async fn find_by_email_or_phone(
        &mut self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, StorageError>;

    async fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>, StorageError>;

    /// The contact `primary_id` plus every contact linked to it, oldest first.
    async fn find_members_of_identity(
        &mut self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, StorageError>;

    /// Insert a contact; the store assigns id and timestamps.
    async fn create(&mut self, contact: NewContact) -> Result<Contact, StorageError>;

    /// Apply `update` and refresh `updated_at`. `NotFound` if the id is absent or deleted.
    async fn update(
        &mut self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<Contact, StorageError>;

    /// Point every contact linked to `from` at `to`. Returns how many moved.
    async fn reassign_secondaries(
        &mut self,
        from: ContactId,
        to: ContactId,
    ) -> Result<u64, StorageError>;

    /// Every contact, oldest first.
    async fn list_all(&mut self) -> Result<Vec<Contact>, StorageError>;

    async fn commit(self) -> Result<(), StorageError>;

    async fn rollback(self) -> Result<(), StorageError>;
}
