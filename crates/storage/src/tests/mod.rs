//! Test utilities and module declarations for storage tests.

use contact_identity_core::{Contact, NewContact};

use crate::MemoryStorage;
use crate::traits::{ContactStore, ContactTransaction};

pub fn create_test_storage() -> MemoryStorage {
    MemoryStorage::new()
}

pub fn email(v: &str) -> Option<String> {
    Some(v.to_owned())
}

pub fn phone(v: &str) -> Option<String> {
    Some(v.to_owned())
}

/// Insert contacts in one committed transaction, returning them in order.
#[expect(clippy::unwrap_used, reason = "test code")]
pub async fn seed(storage: &MemoryStorage, contacts: Vec<NewContact>) -> Vec<Contact> {
    let mut tx = storage.begin().await.unwrap();
    let mut created = Vec::with_capacity(contacts.len());
    for c in contacts {
        created.push(tx.create(c).await.unwrap());
    }
    tx.commit().await.unwrap();
    created
}
