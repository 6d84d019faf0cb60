//! Database connection module for the MediConnect application
//!
//! SQLite is the supported backend. The pool is kept in a process-global
//! cell so that repositories created anywhere in the application share it.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use r2d2::ManageConnection;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;

/// Global database pool used throughout the application
static DB_POOL: OnceCell<DatabasePool> = OnceCell::new();

/// r2d2 pool of SQLite connections
pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// Pooled SQLite connection
pub type SqliteConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Supported database types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// SQLite database (file-based)
    Sqlite,
}

impl FromStr for DatabaseType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(DatabaseType::Sqlite),
            _ => Err(DatabaseError::UnsupportedDatabaseType(s.to_string())),
        }
    }
}

/// Database error
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Database pool already initialized
    #[error("Database pool is already initialized")]
    PoolAlreadyInitialized,

    /// Database pool not initialized
    #[error("Database pool is not initialized")]
    PoolNotInitialized,

    /// Unsupported database type
    #[error("Unsupported database type: {0}")]
    UnsupportedDatabaseType(String),

    /// Migration error
    #[error("Database migration error: {0}")]
    Migration(String),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database type
    pub db_type: DatabaseType,
    /// Path to SQLite database file
    pub sqlite_path: Option<String>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DatabaseType::Sqlite,
            sqlite_path: Some("data/mediconnect.db".to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Create a new database configuration from environment variables
    pub fn from_env() -> Result<Self, DatabaseError> {
        let defaults = Self::default();

        let db_type = env::var("DB_TYPE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .parse::<DatabaseType>()?;

        let sqlite_path = env::var("DB_SQLITE_PATH").ok().or(defaults.sqlite_path);

        let max_connections = parse_env_or("DB_MAX_CONNECTIONS", defaults.max_connections);
        let timeout_seconds = parse_env_or("DB_TIMEOUT_SECONDS", defaults.timeout_seconds);

        info!(
            "Database configuration: type={:?}, path={:?}, max_connections={}, timeout={}s",
            db_type, sqlite_path, max_connections, timeout_seconds
        );

        Ok(DatabaseConfig {
            db_type,
            sqlite_path,
            max_connections,
            timeout_seconds,
        })
    }
}

fn parse_env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Shared handle to the SQLite connection pool
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: Arc<SqlitePool>,
    location: String,
}

impl DatabasePool {
    /// Open a file-backed pool as described by `config`.
    ///
    /// Falls back to an in-memory database when the file cannot be used.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let sqlite_path = config
            .sqlite_path
            .clone()
            .unwrap_or_else(|| "data/mediconnect.db".to_string());

        info!("Initializing SQLite database at: {}", sqlite_path);

        if let Some(parent) = Path::new(&sqlite_path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                info!("Creating parent directory: {:?}", parent);
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!("Failed to create directory: {}, falling back to in-memory database", e);
                    return Self::in_memory_with(config);
                }
            }
        }

        let manager = SqliteConnectionManager::file(&sqlite_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| conn.busy_timeout(Duration::from_secs(5)));

        // One direct open first: r2d2 would keep retrying an unusable file
        // for the whole connection timeout.
        if let Err(e) = manager.connect() {
            error!("Failed to open SQLite database {}: {}", sqlite_path, e);
            warn!("Falling back to in-memory SQLite database");
            return Self::in_memory_with(config);
        }

        let pool = match r2d2::Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(manager)
        {
            Ok(pool) => pool,
            Err(e) => {
                error!("Failed to create SQLite connection pool: {}", e);
                warn!("Falling back to in-memory SQLite database");
                return Self::in_memory_with(config);
            }
        };

        let db = Self {
            pool: Arc::new(pool),
            location: sqlite_path,
        };
        db.migrate()?;

        info!("SQLite connection pool created successfully");
        Ok(db)
    }

    /// Open a migrated in-memory database.
    pub fn in_memory() -> Result<Self, DatabaseError> {
        Self::in_memory_with(&DatabaseConfig::default())
    }

    fn in_memory_with(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        info!("Initializing in-memory SQLite database");

        // Every in-memory connection is a separate database, so the pool
        // holds exactly one connection and never recycles it.
        let pool = r2d2::Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connection_timeout(Duration::from_secs(config.timeout_seconds))
            .build(SqliteConnectionManager::memory())?;

        let db = Self {
            pool: Arc::new(pool),
            location: ":memory:".to_string(),
        };
        db.migrate()?;

        Ok(db)
    }

    /// Check a connection out of the pool
    pub fn get(&self) -> Result<SqliteConnection, DatabaseError> {
        Ok(self.pool.get()?)
    }

    /// Verify that the database answers queries
    pub fn ping(&self) -> Result<(), DatabaseError> {
        let conn = self.get()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Whether the pool points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.location == ":memory:"
    }

    /// Human-readable description of the pool
    pub fn describe(&self) -> String {
        let state = self.pool.state();
        let target = if self.is_in_memory() {
            "SQLite in-memory database".to_string()
        } else {
            format!("SQLite database at {}", self.location)
        };
        format!(
            "{} (connections: active={}, idle={})",
            target, state.connections, state.idle_connections
        )
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        let conn = self.get()?;
        run_sqlite_migrations(&conn)
    }
}

/// Initialize the global database connection pool
pub fn initialize_database_pool() -> Result<DatabasePool, DatabaseError> {
    if DB_POOL.get().is_some() {
        return Err(DatabaseError::PoolAlreadyInitialized);
    }

    let config = DatabaseConfig::from_env()?;
    info!("Initializing database pool with type: {:?}", config.db_type);

    let pool = match config.db_type {
        DatabaseType::Sqlite => DatabasePool::connect(&config)?,
    };

    DB_POOL
        .set(pool.clone())
        .map_err(|_| DatabaseError::PoolAlreadyInitialized)?;

    Ok(pool)
}

/// Get the database connection pool
pub fn get_db_pool() -> Result<DatabasePool, DatabaseError> {
    DB_POOL.get().cloned().ok_or(DatabaseError::PoolNotInitialized)
}

/// Get information about the current database connection
pub fn get_connection_info() -> Option<String> {
    DB_POOL.get().map(DatabasePool::describe)
}
