//! Repository test doubles
//!
//! Available to this crate's tests and to dependents through the `mock` feature.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::database::DatabaseError;
use crate::models::medication::MedicationRecord;
use crate::models::user::{NewUserRecord, UserRecord};
use super::errors::RepositoryError;
use super::medication::MedicationRepositoryTrait;
use super::user::UserRepositoryTrait;

fn unavailable() -> RepositoryError {
    RepositoryError::Database(DatabaseError::PoolNotInitialized)
}

/// Mock implementation of `UserRepositoryTrait`
#[derive(Debug, Clone, Default)]
pub struct MockUserRepository {
    users: Arc<Mutex<Vec<UserRecord>>>,
    fail: bool,
}

impl MockUserRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository with predefined users
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            fail: false,
        }
    }

    /// Create a mock repository whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Users stored so far
    pub fn stored(&self) -> Vec<UserRecord> {
        self.users.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    async fn create(&self, user: NewUserRecord) -> Result<UserRecord, RepositoryError> {
        if self.fail {
            return Err(unavailable());
        }

        let mut users = self.users.lock()?;
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(RepositoryError::Conflict(format!(
                "A user with email {} already exists",
                user.email
            )));
        }

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now().to_rfc3339(),
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        if self.fail {
            return Err(unavailable());
        }

        let users = self.users.lock()?;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }
}

/// Mock implementation of `MedicationRepositoryTrait`
#[derive(Debug, Clone, Default)]
pub struct MockMedicationRepository {
    records: Arc<Mutex<Vec<MedicationRecord>>>,
    fail: bool,
}

impl MockMedicationRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock repository with predefined records
    pub fn with_records(records: Vec<MedicationRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
            fail: false,
        }
    }

    /// Create a mock repository whose every call fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl MedicationRepositoryTrait for MockMedicationRepository {
    async fn create(&self, record: MedicationRecord) -> Result<MedicationRecord, RepositoryError> {
        if self.fail {
            return Err(unavailable());
        }

        self.records.lock()?.push(record.clone());
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<MedicationRecord>, RepositoryError> {
        if self.fail {
            return Err(unavailable());
        }

        Ok(self.records.lock()?.clone())
    }
}
