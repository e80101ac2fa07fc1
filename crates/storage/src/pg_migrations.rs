//! PostgreSQL schema migrations for contact-identity storage.

use sqlx::PgPool;

/// Create the `contacts` table and its indexes. Idempotent.
pub(crate) async fn run_pg_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id BIGSERIAL PRIMARY KEY,
            phone_number TEXT,
            email TEXT,
            linked_id BIGINT REFERENCES contacts (id),
            link_precedence TEXT NOT NULL DEFAULT 'primary'
                CHECK (link_precedence IN ('primary', 'secondary')),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            deleted_at TIMESTAMPTZ,
            CONSTRAINT contacts_has_attribute CHECK (email IS NOT NULL OR phone_number IS NOT NULL),
            CONSTRAINT contacts_link_matches_precedence CHECK (
                (link_precedence = 'primary' AND linked_id IS NULL)
                OR (link_precedence = 'secondary' AND linked_id IS NOT NULL)
            )
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_contacts_email ON contacts (email) WHERE deleted_at IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_contacts_phone ON contacts (phone_number) WHERE deleted_at IS NULL",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_contacts_linked ON contacts (linked_id) WHERE deleted_at IS NULL",
    )
    .execute(pool)
    .await?;

    // Racing inserts of a never-seen pair both see no matches; the second fails with 23505.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_contacts_attribute_pair
            ON contacts (COALESCE(email, ''), COALESCE(phone_number, ''))
            WHERE deleted_at IS NULL
        "#,
    )
    .execute(pool)
    .await?;

    tracing::debug!("contacts schema ready");
    Ok(())
}
