//! Unified storage backend with enum dispatch.

use async_trait::async_trait;
use contact_identity_core::{Contact, ContactId, ContactUpdate, NewContact};

use crate::StorageError;
use crate::memory::{MemoryStorage, MemoryTransaction};
use crate::traits::{ContactStore, ContactTransaction};

macro_rules! dispatch {
    ($self:expr, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            BackendTransaction::Memory(tx) => tx.$method($($arg),*).await,
            #[cfg(feature = "postgres")]
            BackendTransaction::Postgres(tx) => tx.$method($($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Memory(MemoryStorage),
    #[cfg(feature = "postgres")]
    Postgres(crate::pg_storage::PgStorage),
}

impl StorageBackend {
    #[must_use]
    pub fn new_memory() -> Self {
        Self::Memory(MemoryStorage::new())
    }

    #[cfg(feature = "postgres")]
    pub async fn new_postgres(
        database_url: &str,
        max_connections: u32,
    ) -> Result<Self, StorageError> {
        Ok(Self::Postgres(crate::pg_storage::PgStorage::new(database_url, max_connections).await?))
    }

    /// Short backend name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => "postgres",
        }
    }
}

/// Transaction handle of whichever backend opened it.
pub enum BackendTransaction {
    Memory(MemoryTransaction),
    #[cfg(feature = "postgres")]
    Postgres(crate::pg_storage::PgContactTransaction),
}

#[async_trait]
impl ContactStore for StorageBackend {
    type Transaction = BackendTransaction;

    async fn begin(&self) -> Result<BackendTransaction, StorageError> {
        match self {
            Self::Memory(s) => Ok(BackendTransaction::Memory(s.begin().await?)),
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => Ok(BackendTransaction::Postgres(s.begin().await?)),
        }
    }

    async fn clear_all(&self) -> Result<u64, StorageError> {
        match self {
            Self::Memory(s) => s.clear_all().await,
            #[cfg(feature = "postgres")]
            Self::Postgres(s) => s.clear_all().await,
        }
    }
}

#[async_trait]
impl ContactTransaction for BackendTransaction {
    async fn find_by_email_or_phone(
        &mut self,
        email: Option<&str>,
        phone_number: Option<&str>,
    ) -> Result<Vec<Contact>, StorageError> {
        dispatch!(self, find_by_email_or_phone(email, phone_number))
    }

    async fn find_by_id(&mut self, id: ContactId) -> Result<Option<Contact>, StorageError> {
        dispatch!(self, find_by_id(id))
    }

    async fn find_members_of_identity(
        &mut self,
        primary_id: ContactId,
    ) -> Result<Vec<Contact>, StorageError> {
        dispatch!(self, find_members_of_identity(primary_id))
    }

    async fn create(&mut self, contact: NewContact) -> Result<Contact, StorageError> {
        dispatch!(self, create(contact))
    }

    async fn update(
        &mut self,
        id: ContactId,
        update: ContactUpdate,
    ) -> Result<Contact, StorageError> {
        dispatch!(self, update(id, update))
    }

    async fn reassign_secondaries(
        &mut self,
        from: ContactId,
        to: ContactId,
    ) -> Result<u64, StorageError> {
        dispatch!(self, reassign_secondaries(from, to))
    }

    async fn list_all(&mut self) -> Result<Vec<Contact>, StorageError> {
        dispatch!(self, list_all())
    }

    async fn commit(self) -> Result<(), StorageError> {
        dispatch!(self, commit())
    }

    async fn rollback(self) -> Result<(), StorageError> {
        dispatch!(self, rollback())
    }
}
