//! PostgreSQL storage backend using sqlx.

mod contacts;

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contact_identity_core::{
    Contact, ContactId, LinkPrecedence, PG_POOL_ACQUIRE_TIMEOUT_SECS, PG_POOL_IDLE_TIMEOUT_SECS,
};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};

use crate::error::StorageError;
use crate::pg_migrations::run_pg_migrations;
use crate::traits::ContactStore;

pub(crate) const CONTACT_COLUMNS: &str =
    "id, email, phone_number, linked_id, link_precedence, created_at, updated_at, deleted_at";

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Connect, then bring the schema up to date.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .idle_timeout(Duration::from_secs(PG_POOL_IDLE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;
        run_pg_migrations(&pool).await.map_err(|e| StorageError::Migration(e.to_string()))?;
        tracing::info!(max_connections, "PgStorage initialized");
        Ok(Self { pool })
    }
}

pub(crate) fn row_to_contact(row: &PgRow) -> Result<Contact, StorageError> {
    let precedence: String = row.try_get("link_precedence")?;
    let link_precedence =
        precedence.parse::<LinkPrecedence>().map_err(|e| StorageError::DataCorruption {
            context: "contacts.link_precedence".to_owned(),
            source: Box::new(e),
        })?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    Ok(Contact {
        id: ContactId(row.try_get("id")?),
        email: row.try_get("email")?,
        phone_number: row.try_get("phone_number")?,
        linked_id: row.try_get::<Option<i64>, _>("linked_id")?.map(ContactId),
        link_precedence,
        created_at,
        updated_at,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl ContactStore for PgStorage {
    type Transaction = PgContactTransaction;

    async fn begin(&self) -> Result<PgContactTransaction, StorageError> {
        Ok(PgContactTransaction { tx: self.pool.begin().await? })
    }

    async fn clear_all(&self) -> Result<u64, StorageError> {
        let mut tx = self.pool.begin().await?;
        let removed: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contacts")
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query("TRUNCATE TABLE contacts RESTART IDENTITY").execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(u64::try_from(removed).unwrap_or(0))
    }
}

/// Open transaction over [`PgStorage`]. Rolled back on drop unless committed.
pub struct PgContactTransaction {
    tx: Transaction<'static, Postgres>,
}
