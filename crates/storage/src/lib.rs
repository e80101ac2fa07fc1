//! Storage layer for contact-identity
//!
//! A transactional contact store behind the [`traits::ContactStore`] /
//! [`traits::ContactTransaction`] pair, with a PostgreSQL backend (sqlx) and
//! an in-memory backend used by tests and database-less runs.

mod backend;
mod error;
mod memory;
#[cfg(feature = "postgres")]
mod pg_migrations;
#[cfg(feature = "postgres")]
mod pg_storage;
#[cfg(test)]
mod tests;
pub mod traits;

pub use backend::{BackendTransaction, StorageBackend};
pub use error::StorageError;
pub use memory::{MemoryStorage, MemoryTransaction};
#[cfg(feature = "postgres")]
pub use pg_storage::{PgContactTransaction, PgStorage};
