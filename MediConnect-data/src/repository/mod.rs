// Repository module structure
pub mod errors;
mod in_memory;
mod medication;
mod storage;
mod user;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use medication::{MedicationRepository, MedicationRepositoryTrait};
pub use user::{UserRepository, UserRepositoryTrait};

// Test doubles for both testing and when mock feature is enabled
#[cfg(any(test, feature = "mock"))]
pub mod tests;
