// Public entities for the MediConnect API
// This module contains data structures that are shared across the application boundary

// Common entities for error handling and plain messages
pub mod common;

// Registration and login entities
pub mod auth;

// Medication documents are exposed as the domain defines them
pub use mediconnect_domain::entities::{
    Alternative, CreateMedicationRequest, FlaggingOrganization, HealthImpact, Incident, Medication,
    MedicationQuery, MedicationSort, RecentUpdate, Warning,
};
