// MediConnect Domain
// This crate contains the business logic for the MediConnect application

// Services that implement business logic
pub mod services;

// Authentication: password hashing, tokens and auth event logging
pub mod auth;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the database module from the data layer for convenience
pub use mediconnect_data::database;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
