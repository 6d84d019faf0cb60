use async_trait::async_trait;
use tracing::debug;

use crate::database::DatabasePool;
use crate::models::medication::MedicationRecord;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::{DatabaseStorage, StorageBackend};

/// Repository trait for medication documents
#[async_trait]
pub trait MedicationRepositoryTrait {
    /// Store a medication document as given
    async fn create(&self, record: MedicationRecord) -> Result<MedicationRecord, RepositoryError>;

    /// All medication documents, oldest first
    async fn list_all(&self) -> Result<Vec<MedicationRecord>, RepositoryError>;
}

/// Repository for medications, backed by SQLite when the pool is available
#[derive(Debug, Clone)]
pub struct MedicationRepository {
    backend: StorageBackend,
}

impl Default for MedicationRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MedicationRepository {
    /// Create a repository on the global pool, or in memory if there is none
    pub fn new() -> Self {
        Self {
            backend: StorageBackend::detect(),
        }
    }

    /// Create a repository on an explicit pool
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self {
            backend: StorageBackend::Database(pool),
        }
    }

    /// Create a repository that only keeps data in memory
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory(InMemoryStorage::new()),
        }
    }
}

#[async_trait]
impl MedicationRepositoryTrait for MedicationRepository {
    async fn create(&self, record: MedicationRecord) -> Result<MedicationRecord, RepositoryError> {
        match &self.backend {
            StorageBackend::Database(pool) => DatabaseStorage::insert_medication(pool, record).await,
            StorageBackend::Memory(storage) => {
                debug!("Storing medication in memory: id={}", record.id);
                storage.insert_medication(record)
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<MedicationRecord>, RepositoryError> {
        match &self.backend {
            StorageBackend::Database(pool) => DatabaseStorage::list_medications(pool).await,
            StorageBackend::Memory(storage) => storage.list_medications(),
        }
    }
}
