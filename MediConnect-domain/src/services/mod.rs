// Domain services
// This module contains business logic implementations.
pub mod medication;
pub mod user;

// Re-export service traits and factory functions
pub use medication::{
    create_default_medication_service, MedicationService, MedicationServiceError,
    MedicationServiceTrait,
};
pub use user::{create_default_user_service, UserService, UserServiceError, UserServiceTrait};
