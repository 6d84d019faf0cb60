pub mod auth;
pub mod health;
pub mod medications;

// Re-export handlers for easier imports
pub use auth::{login, register};
pub use health::health_check;
pub use medications::{create_medication, list_medications};
