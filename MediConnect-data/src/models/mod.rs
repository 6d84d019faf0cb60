// Storage models
pub mod medication;
pub mod user;
