// Testing utilities and mock implementations for the domain layer
// This module is only available when the "mock" feature is enabled

use std::collections::HashMap;

use async_trait::async_trait;

// Re-export useful test mocks from the data layer
pub use mediconnect_data::repository::tests::{MockMedicationRepository, MockUserRepository};

use crate::auth::{PasswordHasher, TokenConfig};
use crate::entities::{CreateMedicationRequest, FlaggingOrganization, HealthImpact, Incident, RegisterUser};
use crate::health::{ComponentStatus, HealthComponent, HealthServiceTrait, SystemHealth};
use crate::services::{MedicationService, UserService};

/// Secret used by test token configurations
pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_only";

/// Token settings for tests
pub fn test_token_config() -> TokenConfig {
    TokenConfig::new(TEST_JWT_SECRET, "mediconnect-test", 60)
}

/// User service on a mock repository with the cheapest bcrypt cost
pub fn mock_user_service(repository: MockUserRepository) -> UserService<MockUserRepository> {
    UserService::new(repository, PasswordHasher::new(4), test_token_config())
}

/// Medication service on a mock repository
pub fn mock_medication_service(repository: MockMedicationRepository) -> MedicationService<MockMedicationRepository> {
    MedicationService::new(repository)
}

/// A valid registration
pub fn sample_registration(email: &str) -> RegisterUser {
    RegisterUser {
        name: "Test User".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
    }
}

/// A valid medication submission
pub fn sample_medication_request(name: &str) -> CreateMedicationRequest {
    CreateMedicationRequest {
        name: name.to_string(),
        generic_name: format!("{} generic", name),
        category: "Analgesics".to_string(),
        status: "Warning Issued".to_string(),
        bad_effect_score: 80.0,
        flagged_by_score: 70.0,
        organizations: vec![FlaggingOrganization {
            organization: Some("WHO".to_string()),
            flagged_at: None,
        }],
        health_impacts: vec![HealthImpact {
            impact_type: Some("Liver damage".to_string()),
            description: None,
            severity: Some("Moderate".to_string()),
            evidence_level: Some("Strong".to_string()),
        }],
        incidents: vec![Incident {
            description: Some("Reported overdose".to_string()),
            severity: Some(2.5),
            location: Some("USA".to_string()),
            affected_patients: Some(100.0),
            ..Default::default()
        }],
        alternatives: vec![],
        warnings: vec![],
        recent_updates: vec![],
        added_by: "admin".to_string(),
    }
}

/// Mock implementation of HealthServiceTrait for testing
#[derive(Debug, Clone)]
pub struct MockHealthService {
    database_status: ComponentStatus,
    components: HashMap<String, HealthComponent>,
}

impl Default for MockHealthService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHealthService {
    /// Create a new mock health service with all components healthy
    pub fn new() -> Self {
        Self {
            database_status: ComponentStatus::Healthy,
            components: HashMap::new(),
        }
    }

    /// Configure the mock with a degraded database
    pub fn with_degraded_database(mut self) -> Self {
        self.database_status = ComponentStatus::Degraded;
        self
    }

    /// Configure the mock with an unhealthy database
    pub fn with_unhealthy_database(mut self) -> Self {
        self.database_status = ComponentStatus::Unhealthy;
        self
    }

    /// Add a custom component with a specific status
    pub fn with_component(mut self, name: &str, status: ComponentStatus, details: Option<String>) -> Self {
        self.components
            .insert(name.to_string(), HealthComponent { status, details });
        self
    }
}

#[async_trait]
impl HealthServiceTrait for MockHealthService {
    async fn get_system_health(&self) -> SystemHealth {
        let mut components = self.components.clone();

        components.insert(
            "database".to_string(),
            HealthComponent {
                status: self.database_status,
                details: match self.database_status {
                    ComponentStatus::Healthy => None,
                    ComponentStatus::Degraded => Some("Using in-memory storage".to_string()),
                    ComponentStatus::Unhealthy => Some("Database connection failed".to_string()),
                },
            },
        );

        SystemHealth::from_components(components)
    }
}
