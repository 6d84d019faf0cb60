use std::sync::{Arc, Mutex};

use crate::models::medication::MedicationRecord;
use crate::models::user::UserRecord;
use super::errors::RepositoryError;

/// In-memory storage used when no database pool is available
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorage {
    /// Registered users
    users: Arc<Mutex<Vec<UserRecord>>>,
    /// Medication documents in insertion order
    medications: Arc<Mutex<Vec<MedicationRecord>>>,
}

impl InMemoryStorage {
    /// Create a new in-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a user, rejecting a duplicate email
    pub fn insert_user(&self, user: UserRecord) -> Result<UserRecord, RepositoryError> {
        let mut users = self.users.lock()?;

        if users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(RepositoryError::Conflict(format!(
                "A user with email {} already exists",
                user.email
            )));
        }

        users.push(user.clone());
        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let users = self.users.lock()?;
        Ok(users.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    /// Store a medication document
    pub fn insert_medication(&self, record: MedicationRecord) -> Result<MedicationRecord, RepositoryError> {
        let mut medications = self.medications.lock()?;

        if medications.iter().any(|m| m.id == record.id) {
            return Err(RepositoryError::Conflict(format!(
                "A medication with id {} already exists",
                record.id
            )));
        }

        medications.push(record.clone());
        Ok(record)
    }

    /// All medication documents, oldest first
    pub fn list_medications(&self) -> Result<Vec<MedicationRecord>, RepositoryError> {
        Ok(self.medications.lock()?.clone())
    }
}
