use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use mediconnect_domain::entities::{AuthenticatedUser, RegisterUser, User};

/// Registration request payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicRegistrationRequest {
    /// Full name
    pub name: String,

    /// Email address (must be valid format, unique)
    pub email: String,

    /// Password (must be at least 8 characters)
    pub password: String,
}

impl From<PublicRegistrationRequest> for RegisterUser {
    fn from(request: PublicRegistrationRequest) -> Self {
        RegisterUser {
            name: request.name,
            email: request.email,
            password: request.password,
        }
    }
}

/// Login request payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicLoginRequest {
    pub email: String,
    pub password: String,
}

/// User information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Login response payload
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicLoginResponse {
    /// Always "Login successful"
    pub message: String,

    /// JWT access token
    pub token: String,

    /// Token type (Bearer)
    pub token_type: String,

    /// Expiration time in seconds
    pub expires_in: i64,

    pub user: PublicUserInfo,
}

impl From<AuthenticatedUser> for PublicLoginResponse {
    fn from(auth: AuthenticatedUser) -> Self {
        Self {
            message: "Login successful".to_string(),
            token: auth.access_token,
            token_type: auth.token_type,
            expires_in: auth.expires_in,
            user: auth.user.into(),
        }
    }
}
