use std::env;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::auth::logging::log_token_validation;
use crate::auth::Claims;

/// Secret used when `JWT_SECRET` is not set. Development only.
const DEVELOPMENT_SECRET: &str = "mediconnect-development-secret";
const DEFAULT_ISSUER: &str = "mediconnect-api";
const DEFAULT_EXPIRATION_MINUTES: i64 = 60;

/// Security errors for authentication and token operations
#[derive(Debug, Error)]
pub enum SecurityError {
    /// JWT validation error
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    /// Expired token
    #[error("Token has expired")]
    TokenExpired,

    /// Invalid token structure
    #[error("Invalid token format")]
    InvalidToken,

    /// Invalid issuer
    #[error("Invalid token issuer")]
    InvalidIssuer,

    /// Token could not be created
    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    Hashing(String),
}

/// Settings for issuing and checking access tokens
#[derive(Debug, Clone)]
pub struct TokenConfig {
    secret: String,
    issuer: String,
    expiration_minutes: i64,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>, expiration_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            expiration_minutes: expiration_minutes.max(1),
        }
    }

    /// Read `JWT_SECRET`, `JWT_ISSUER` and `ACCESS_TOKEN_EXPIRATION_MINUTES`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key/value source. Missing or invalid values fall back
    /// to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ => {
                warn!("JWT_SECRET is not set, using the development secret");
                DEVELOPMENT_SECRET.to_string()
            }
        };

        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let expiration_minutes = match lookup("ACCESS_TOKEN_EXPIRATION_MINUTES") {
            Some(raw) => raw.parse::<i64>().unwrap_or_else(|_| {
                warn!(
                    "Invalid ACCESS_TOKEN_EXPIRATION_MINUTES '{}', using {}",
                    raw, DEFAULT_EXPIRATION_MINUTES
                );
                DEFAULT_EXPIRATION_MINUTES
            }),
            None => DEFAULT_EXPIRATION_MINUTES,
        };

        Self::new(secret, issuer, expiration_minutes)
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> i64 {
        self.expiration().num_seconds()
    }

    fn expiration(&self) -> Duration {
        Duration::minutes(self.expiration_minutes)
    }

    /// Issue a signed access token for a user
    pub fn generate_token(&self, user_id: &str, email: &str) -> Result<String, SecurityError> {
        let now = Utc::now();
        let expiration = now + self.expiration();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            error!("Failed to encode JWT token: {}", e);
            SecurityError::TokenGeneration(e.to_string())
        })?;

        // Never log the token itself
        debug!("Issued access token for user {} expiring at {}", user_id, expiration);

        Ok(token)
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, SecurityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
            jsonwebtoken::errors::ErrorKind::InvalidToken => SecurityError::InvalidToken,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => SecurityError::InvalidIssuer,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                SecurityError::TokenValidation("Invalid signature".to_string())
            }
            _ => SecurityError::TokenValidation(e.to_string()),
        });

        match token_data {
            Ok(data) => {
                log_token_validation(Some(&data.claims.sub), true, None);
                Ok(data.claims)
            }
            Err(e) => {
                log_token_validation(None, false, Some(&e.to_string()));
                Err(e)
            }
        }
    }
}
