use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::database::DatabasePool;
use crate::models::user::{NewUserRecord, UserRecord};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::{DatabaseStorage, StorageBackend};

/// Repository trait for registered users
#[async_trait]
pub trait UserRepositoryTrait {
    /// Store a new user. Fails with `Conflict` when the email is taken.
    async fn create(&self, user: NewUserRecord) -> Result<UserRecord, RepositoryError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
}

/// Repository for users, backed by SQLite when the pool is available
#[derive(Debug, Clone)]
pub struct UserRepository {
    backend: StorageBackend,
}

impl Default for UserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository {
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
impl UserRepositoryTrait for UserRepository {
    async fn create(&self, user: NewUserRecord) -> Result<UserRecord, RepositoryError> {
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now().to_rfc3339(),
        };

        match &self.backend {
            StorageBackend::Database(pool) => DatabaseStorage::insert_user(pool, record).await,
            StorageBackend::Memory(storage) => {
                debug!("Storing user in memory: id={}", record.id);
                storage.insert_user(record)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        match &self.backend {
            StorageBackend::Database(pool) => DatabaseStorage::find_user_by_email(pool, email).await,
            StorageBackend::Memory(storage) => storage.find_user_by_email(email),
        }
    }
}
