//! ContactTransaction implementation for PgStorage.

use super::*;

use contact_identity_core::{ContactUpdate, NewContact};

use crate::traits::ContactTransaction;

#[async_trait]
impl ContactTransaction for PgContactTransaction {
    async fn find_by_email_or_phone(
        &mut self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, StorageError> {
        if email.is_none() && phone_number.is_none() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE deleted_at IS NULL
               AND (($1::TEXT IS NOT NULL AND email = $1)
                 OR ($2::TEXT IS NOT NULL AND phone_number = $2))
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(email)
        .bind(phone_number)
        .fetch_all(&mut *self.tx)
        .await?;
        rows.iter().map(row_to_contact).collect()
    }

    async fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>, StorageError> {
        let row = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.0)
        .fetch_optional(&mut *self.tx)
        .await?;
        row.map(|r| row_to_contact(&r)).transpose()
    }

    async fn find_members_of_identity(
        &mut self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE deleted_at IS NULL AND (id = $1 OR linked_id = $1)
             ORDER BY created_at ASC, id ASC"
        ))
        .bind(primary_id.0)
        .fetch_all(&mut *self.tx)
        .await?;
        rows.iter().map(row_to_contact).collect()
    }

    async fn create(&mut self, contact: NewContact) -> Result<Contact, StorageError> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO contacts (email, phone_number, linked_id, link_precedence, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(&contact.email)
        .bind(&contact.phone_number)
        .bind(contact.linked_id.map(|id| id.0))
        .bind(contact.link_precedence.as_str())
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await?;
        row_to_contact(&row)
    }

    async fn update(
        &mut self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<Contact, StorageError> {
        let row = sqlx::query(&format!(
            "UPDATE contacts
             SET link_precedence = COALESCE($2, link_precedence),
                 linked_id = COALESCE($3, linked_id),
                 updated_at = $4
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id.0)
        .bind(update.link_precedence.map(|p| p.as_str()))
        .bind(update.linked_id.map(|l| l.0))
        .bind(Utc::now())
        .fetch_optional(&mut *self.tx)
        .await?;
        match row {
            Some(r) => row_to_contact(&r),
            None => Err(StorageError::contact_not_found(id)),
        }
    }

    async fn reassign_secondaries(
        &mut self,
        from: ContactId,
        to: ContactId,
    ) -> Result<u64, StorageError> {
        let result = sqlx::query(
            "UPDATE contacts SET linked_id = $2, updated_at = $3
             WHERE linked_id = $1 AND deleted_at IS NULL",
        )
        .bind(from.0)
        .bind(to.0)
        .bind(Utc::now())
        .execute(&mut *self.tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn list_all(&mut self) -> Result<Vec<Contact>, StorageError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             WHERE deleted_at IS NULL
             ORDER BY created_at ASC, id ASC"
        ))
        .fetch_all(&mut *self.tx)
        .await?;
        rows.iter().map(row_to_contact).collect()
    }

    async fn commit(self) -> Result<(), StorageError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
