use rusqlite::Connection;
use tracing::info;

use crate::database::DatabaseError;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_users_table(conn)?;
    create_medications_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the users table
fn create_users_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating users table if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
    .map_err(|e| DatabaseError::Migration(format!("Failed to create users table: {}", e)))
}

/// Create the medications table.
///
/// `seq` preserves insertion order for listing.
fn create_medications_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating medications table if not exists");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS medications (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            generic_name TEXT NOT NULL,
            category TEXT NOT NULL,
            status TEXT NOT NULL,
            bad_effect_score REAL NOT NULL,
            flagged_by_score REAL NOT NULL,
            organizations TEXT NOT NULL DEFAULT '[]',
            health_impacts TEXT NOT NULL DEFAULT '[]',
            incidents TEXT NOT NULL DEFAULT '[]',
            alternatives TEXT NOT NULL DEFAULT '[]',
            warnings TEXT NOT NULL DEFAULT '[]',
            recent_updates TEXT NOT NULL DEFAULT '[]',
            added_by TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_medications_category
        ON medications (category);",
    )
    .map_err(|e| DatabaseError::Migration(format!("Failed to create medications table: {}", e)))
}
