//! Integration tests for PgStorage.
//! Run with: DATABASE_URL=... cargo test -p contact-identity-storage -- --ignored pg_

#![cfg(feature = "postgres")]
#![allow(clippy::unwrap_used, reason = "integration test code")]

use contact_identity_core::{ContactId, ContactUpdate, LinkPrecedence, NewContact};
use contact_identity_storage::PgStorage;
use contact_identity_storage::traits::{ContactStore, ContactTransaction};
use tokio::sync::{Mutex, MutexGuard};

// Every test truncates the table, so they must not interleave.
static DB_LOCK: Mutex<()> = Mutex::const_new(());

async fn create_pg_storage() -> (PgStorage, MutexGuard<'static, ()>) {
    let guard = DB_LOCK.lock().await;
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStorage integration tests");
    let storage = PgStorage::new(&url, 5).await.expect("Failed to connect to PostgreSQL");
    storage.clear_all().await.unwrap();
    (storage, guard)
}

fn some(v: &str) -> Option<String> {
    Some(v.to_owned())
}

#[tokio::test]
#[ignore]
async fn pg_create_and_find_by_email_or_phone() {
    let (storage, _guard) = create_pg_storage().await;

    let mut tx = storage.begin().await.unwrap();
    let a = tx.create(NewContact::primary(some("a@x.com"), some("111"))).await.unwrap();
    let b = tx.create(NewContact::primary(some("b@x.com"), some("222"))).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(a.link_precedence, LinkPrecedence::Primary);
    assert!(a.linked_id.is_none());
    assert!(a.id < b.id);

    let mut tx = storage.begin().await.unwrap();
    let found = tx.find_by_email_or_phone(Some("a@x.com"), Some("222")).await.unwrap();
    assert_eq!(found.iter().map(|c| c.id).collect::<Vec<_>>(), vec![a.id, b.id]);

    let by_phone = tx.find_by_email_or_phone(None, Some("111")).await.unwrap();
    assert_eq!(by_phone.len(), 1);
    assert!(tx.find_by_email_or_phone(None, None).await.unwrap().is_empty());
    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_rollback_discards_writes() {
    let (storage, _guard) = create_pg_storage().await;

    let mut tx = storage.begin().await.unwrap();
    tx.create(NewContact::primary(some("gone@x.com"), None)).await.unwrap();
    tx.rollback().await.unwrap();

    let mut tx = storage.begin().await.unwrap();
    assert!(tx.list_all().await.unwrap().is_empty());
    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_demote_and_reassign() {
    let (storage, _guard) = create_pg_storage().await;

    let mut tx = storage.begin().await.unwrap();
    let old = tx.create(NewContact::primary(some("a@x.com"), None)).await.unwrap();
    let young = tx.create(NewContact::primary(some("b@x.com"), None)).await.unwrap();
    let child =
        tx.create(NewContact::secondary(some("b@x.com"), some("9"), young.id)).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = storage.begin().await.unwrap();
    let demoted = tx.update(young.id, ContactUpdate::demote_to(old.id)).await.unwrap();
    assert_eq!(demoted.link_precedence, LinkPrecedence::Secondary);
    assert_eq!(demoted.linked_id, Some(old.id));
    assert_eq!(tx.reassign_secondaries(young.id, old.id).await.unwrap(), 1);
    tx.commit().await.unwrap();

    let mut tx = storage.begin().await.unwrap();
    let members = tx.find_members_of_identity(old.id).await.unwrap();
    assert_eq!(members.iter().map(|c| c.id).collect::<Vec<_>>(), vec![old.id, young.id, child.id]);
    assert!(tx.find_by_id(child.id).await.unwrap().unwrap().linked_id == Some(old.id));
    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_update_missing_contact_is_not_found() {
    let (storage, _guard) = create_pg_storage().await;

    let mut tx = storage.begin().await.unwrap();
    let err = tx.update(ContactId(999_999), ContactUpdate::demote_to(ContactId(1))).await;
    assert!(matches!(err, Err(contact_identity_storage::StorageError::NotFound { .. })));
    tx.rollback().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_duplicate_pair_is_rejected() {
    let (storage, _guard) = create_pg_storage().await;

    let mut tx = storage.begin().await.unwrap();
    tx.create(NewContact::primary(some("a@x.com"), some("1"))).await.unwrap();
    tx.commit().await.unwrap();

    let mut tx = storage.begin().await.unwrap();
    let err = tx.create(NewContact::primary(some("a@x.com"), some("1"))).await.unwrap_err();
    assert!(err.is_duplicate());
}

#[tokio::test]
#[ignore]
async fn pg_clear_all_restarts_identity() {
    let (storage, _guard) = create_pg_storage().await;

    let mut tx = storage.begin().await.unwrap();
    tx.create(NewContact::primary(some("a@x.com"), None)).await.unwrap();
    tx.create(NewContact::primary(some("b@x.com"), None)).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(storage.clear_all().await.unwrap(), 2);

    let mut tx = storage.begin().await.unwrap();
    let c = tx.create(NewContact::primary(some("c@x.com"), None)).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(c.id, ContactId(1));
}
