use serde::{Deserialize, Serialize};

/// Storage model for a registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// Unique identifier for the user
    pub id: String,

    /// Display name
    pub name: String,

    /// Normalised (trimmed, lower-cased) email address
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// When the user registered (RFC 3339)
    pub created_at: String,
}

/// Input data for inserting a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUserRecord {
    /// Display name
    pub name: String,

    /// Normalised email address
    pub email: String,

    /// bcrypt hash of the password
    pub password_hash: String,
}
