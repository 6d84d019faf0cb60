//! Authentication for the MediConnect API
//!
//! Password hashing, JWT access tokens and auth event logging.

use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

// Password hashing with bcrypt
pub mod password;

// JWT handling
pub mod token;

// Auth event logging
pub mod logging;

pub use password::PasswordHasher;
pub use token::{SecurityError, TokenConfig};

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Email of the user at issue time
    pub email: String,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}
