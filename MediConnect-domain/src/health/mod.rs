//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::warn;

use mediconnect_data::database::{self, DatabasePool};

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Component name to health
    pub components: HashMap<String, HealthComponent>,
}

impl SystemHealth {
    /// Derive the overall status from the worst component
    pub fn from_components(components: HashMap<String, HealthComponent>) -> Self {
        let status = if components.values().any(|c| c.status == ComponentStatus::Unhealthy) {
            SystemStatus::Unhealthy
        } else if components.values().any(|c| c.status == ComponentStatus::Degraded) {
            SystemStatus::Degraded
        } else {
            SystemStatus::Healthy
        };

        Self { status, components }
    }
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;
}

/// Check a pool.
///
/// - Ok(true): file-backed database answers queries
/// - Ok(false): in-memory fallback, data will not survive a restart
/// - Err: the database does not answer
pub async fn check_pool_status(pool: DatabasePool) -> Result<bool, String> {
    let in_memory = pool.is_in_memory();

    tokio::task::spawn_blocking(move || pool.ping())
        .await
        .map_err(|e| format!("Health check task failed: {}", e))?
        .map_err(|e| format!("Database connection error: {}", e))?;

    Ok(!in_memory)
}

/// Check the global database pool. An uninitialised pool counts as degraded
/// since repositories fall back to memory.
pub async fn check_database_status() -> Result<bool, String> {
    match database::get_db_pool() {
        Ok(pool) => check_pool_status(pool).await,
        Err(e) => {
            warn!("Database pool unavailable: {}", e);
            Ok(false)
        }
    }
}

/// Turn a database check result into a component
pub fn database_component(status: Result<bool, String>) -> HealthComponent {
    match status {
        Ok(true) => HealthComponent {
            status: ComponentStatus::Healthy,
            details: database::get_connection_info(),
        },
        Ok(false) => HealthComponent {
            status: ComponentStatus::Degraded,
            details: Some(
                database::get_connection_info()
                    .unwrap_or_else(|| "Using in-memory storage".to_string()),
            ),
        },
        Err(e) => HealthComponent {
            status: ComponentStatus::Unhealthy,
            details: Some(e),
        },
    }
}

/// Get overall system health
pub async fn get_system_health() -> SystemHealth {
    let db_component = database_component(check_database_status().await);

    SystemHealth::from_components(
        vec![("database".to_string(), db_component)].into_iter().collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_is_degraded() {
        let pool = DatabasePool::in_memory().unwrap();
        assert_eq!(check_pool_status(pool).await, Ok(false));
    }

    #[test]
    fn test_overall_status_is_worst_component() {
        let mut components = HashMap::new();
        components.insert("database".to_string(), database_component(Ok(false)));
        assert_eq!(SystemHealth::from_components(components.clone()).status, SystemStatus::Degraded);

        components.insert("cache".to_string(), database_component(Err("down".to_string())));
        let health = SystemHealth::from_components(components);
        assert_eq!(health.status, SystemStatus::Unhealthy);
        assert_eq!(health.components["cache"].details.as_deref(), Some("down"));
    }

    #[test]
    fn test_empty_components_are_healthy() {
        assert_eq!(SystemHealth::from_components(HashMap::new()).status, SystemStatus::Healthy);
    }
}
