use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::database::{get_db_pool, DatabasePool};
use crate::models::medication::MedicationRecord;
use crate::models::user::UserRecord;
use super::errors::{is_constraint_violation, RepositoryError};
use super::in_memory::InMemoryStorage;

/// Where a repository keeps its data
#[derive(Debug, Clone)]
pub(crate) enum StorageBackend {
    /// SQLite connection pool
    Database(DatabasePool),
    /// Process-local storage
    Memory(InMemoryStorage),
}

impl StorageBackend {
    /// Use the global pool if it has been initialized, otherwise memory
    pub(crate) fn detect() -> Self {
        match get_db_pool() {
            Ok(pool) => StorageBackend::Database(pool),
            Err(e) => {
                debug!("Database not available ({}), using in-memory storage", e);
                StorageBackend::Memory(InMemoryStorage::new())
            }
        }
    }
}

/// Database storage operations for users and medications
pub(crate) struct DatabaseStorage;

impl DatabaseStorage {
    /// Insert a user row
    pub(crate) async fn insert_user(pool: &DatabasePool, user: UserRecord) -> Result<UserRecord, RepositoryError> {
        debug!("Storing user in database: id={}", user.id);

        run_blocking(pool, move |conn| {
            conn.execute(
                "INSERT INTO users (id, name, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![user.id, user.name, user.email, user.password_hash, user.created_at],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    RepositoryError::Conflict(format!("A user with email {} already exists", user.email))
                } else {
                    RepositoryError::Sqlite(e)
                }
            })?;

            Ok(user)
        })
        .await
    }

    /// Look a user up by email
    pub(crate) async fn find_user_by_email(
        pool: &DatabasePool,
        email: &str,
    ) -> Result<Option<UserRecord>, RepositoryError> {
        let email = email.to_string();

        run_blocking(pool, move |conn| {
            let user = conn
                .query_row(
                    "SELECT id, name, email, password_hash, created_at FROM users WHERE email = ?1",
                    params![email],
                    |row| {
                        Ok(UserRecord {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                            password_hash: row.get(3)?,
                            created_at: row.get(4)?,
                        })
                    },
                )
                .optional()?;

            Ok(user)
        })
        .await
    }

    /// Insert a medication row
    pub(crate) async fn insert_medication(
        pool: &DatabasePool,
        record: MedicationRecord,
    ) -> Result<MedicationRecord, RepositoryError> {
        debug!("Storing medication in database: id={}", record.id);

        run_blocking(pool, move |conn| {
            conn.execute(
                "INSERT INTO medications
                 (id, name, generic_name, category, status, bad_effect_score, flagged_by_score,
                  organizations, health_impacts, incidents, alternatives, warnings, recent_updates,
                  added_by, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    record.id,
                    record.name,
                    record.generic_name,
                    record.category,
                    record.status,
                    record.bad_effect_score,
                    record.flagged_by_score,
                    record.organizations,
                    record.health_impacts,
                    record.incidents,
                    record.alternatives,
                    record.warnings,
                    record.recent_updates,
                    record.added_by,
                    record.created_at,
                ],
            )
            .map_err(|e| {
                if is_constraint_violation(&e) {
                    RepositoryError::Conflict(format!("A medication with id {} already exists", record.id))
                } else {
                    RepositoryError::Sqlite(e)
                }
            })?;

            Ok(record)
        })
        .await
    }

    /// All medication rows in insertion order
    pub(crate) async fn list_medications(pool: &DatabasePool) -> Result<Vec<MedicationRecord>, RepositoryError> {
        debug!("Getting all medications from database");

        run_blocking(pool, |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, generic_name, category, status, bad_effect_score, flagged_by_score,
                        organizations, health_impacts, incidents, alternatives, warnings, recent_updates,
                        added_by, created_at
                 FROM medications ORDER BY seq ASC",
            )?;

            let records = stmt
                .query_map([], medication_from_row)?
                .collect::<Result<Vec<_>, _>>()?;

            Ok(records)
        })
        .await
    }
}

fn medication_from_row(row: &Row<'_>) -> rusqlite::Result<MedicationRecord> {
    Ok(MedicationRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        generic_name: row.get(2)?,
        category: row.get(3)?,
        status: row.get(4)?,
        bad_effect_score: row.get(5)?,
        flagged_by_score: row.get(6)?,
        organizations: row.get(7)?,
        health_impacts: row.get(8)?,
        incidents: row.get(9)?,
        alternatives: row.get(10)?,
        warnings: row.get(11)?,
        recent_updates: row.get(12)?,
        added_by: row.get(13)?,
        created_at: row.get(14)?,
    })
}

/// Run a blocking SQLite operation on the blocking thread pool
async fn run_blocking<T, F>(pool: &DatabasePool, op: F) -> Result<T, RepositoryError>
where
    F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();

    tokio::task::spawn_blocking(move || {
        let conn = pool.get()?;
        op(&*conn)
    })
    .await
    .map_err(|e| RepositoryError::Task(e.to_string()))?
}
