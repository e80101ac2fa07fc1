//! In-memory storage backend.
//!
//! All state sits behind one async mutex. A transaction holds the lock for
//! its whole lifetime and works on a private copy of the state, so
//! transactions are fully serialized and a dropped or rolled-back
//! transaction leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use contact_identity_core::{Contact, ContactId, ContactUpdate, NewContact};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::StorageError;
use crate::traits::{ContactStore, ContactTransaction};

#[derive(Debug, Clone)]
struct MemoryState {
    contacts: BTreeMap<ContactId, Contact>,
    next_id: i64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self { contacts: BTreeMap::new(), next_id: 1 }
    }
}

impl MemoryState {
    fn live(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values().filter(|c| c.deleted_at.is_none())
    }

    fn collect_sorted<'a>(iter: impl Iterator<Item = &'a Contact>) -> Vec<Contact> {
        let mut out: Vec<Contact> = iter.cloned().collect();
        out.sort_by_key(Contact::creation_key);
        out
    }
}

/// Thread-safe in-memory contact store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a contact deleted without going through a transaction.
    #[cfg(test)]
    pub(crate) async fn soft_delete(&self, id: ContactId) {
        if let Some(c) = self.state.lock().await.contacts.get_mut(&id) {
            c.deleted_at = Some(Utc::now());
        }
    }
}

#[async_trait]
impl ContactStore for MemoryStorage {
    type Transaction = MemoryTransaction;

    async fn begin(&self) -> Result<MemoryTransaction, StorageError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryTransaction { guard, working })
    }

    async fn clear_all(&self) -> Result<u64, StorageError> {
        let mut state = self.state.lock().await;
        let removed = u64::try_from(state.contacts.len()).unwrap_or(u64::MAX);
        *state = MemoryState::default();
        tracing::debug!(removed, "cleared in-memory contacts");
        Ok(removed)
    }
}

/// Open transaction over [`MemoryStorage`].
pub struct MemoryTransaction {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl ContactTransaction for MemoryTransaction {
    async fn find_by_email_or_phone(
        &mut self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, StorageError> {
        let matches = self.working.live().filter(|c| {
            let by_email = email.is_some() && c.email.as_deref() == email;
            let by_phone = phone_number.is_some() && c.phone_number.as_deref() == phone_number;
            by_email || by_phone
        });
        Ok(MemoryState::collect_sorted(matches))
    }

    async fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>, StorageError> {
        Ok(self.working.live().find(|c| c.id == id).cloned())
    }

    async fn find_members_of_identity(
        &mut self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, StorageError> {
        let members =
            self.working.live().filter(|c| c.id == primary_id || c.linked_id == Some(primary_id));
        Ok(MemoryState::collect_sorted(members))
    }

    async fn create(&mut self, contact: NewContact) -> Result<Contact, StorageError> {
        let clash = self.working.live().any(|c| {
            c.email == contact.email && c.phone_number == contact.phone_number
        });
        if clash {
            return Err(StorageError::Duplicate(format!(
                "contact with email {:?} and phone {:?} already exists",
                contact.email, contact.phone_number
            )));
        }

        let now = Utc::now();
        let id = ContactId(self.working.next_id);
        self.working.next_id += 1;
        let created = Contact {
            id,
            email: contact.email,
            phone_number: contact.phone_number,
            linked_id: contact.linked_id,
            link_precedence: contact.link_precedence,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.working.contacts.insert(id, created.clone());
        Ok(created)
    }

    async fn update(
        &mut self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<Contact, StorageError> {
        let contact = self
            .working
            .contacts
            .get_mut(&id)
            .filter(|c| c.deleted_at.is_none())
            .ok_or_else(|| StorageError::contact_not_found(id))?;
        if let Some(precedence) = update.link_precedence {
            contact.link_precedence = precedence;
        }
        if let Some(linked_id) = update.linked_id {
            contact.linked_id = Some(linked_id);
        }
        contact.updated_at = Utc::now();
        Ok(contact.clone())
    }

    async fn reassign_secondaries(
        &mut self,
        from: ContactId,
        to: ContactId,
    ) -> Result<u64, StorageError> {
        let now = Utc::now();
        let mut moved = 0_u64;
        for contact in self.working.contacts.values_mut() {
            if contact.deleted_at.is_none() && contact.linked_id == Some(from) {
                contact.linked_id = Some(to);
                contact.updated_at = now;
                moved += 1;
            }
        }
        Ok(moved)
    }

    async fn list_all(&mut self) -> Result<Vec<Contact>, StorageError> {
        Ok(MemoryState::collect_sorted(self.working.live()))
    }

    async fn commit(mut self) -> Result<(), StorageError> {
        *self.guard = self.working;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        Ok(())
    }
}
