use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error, info};
use validator::Validate;

use mediconnect_data::models::user::NewUserRecord;
use mediconnect_data::repository::{RepositoryError, UserRepository, UserRepositoryTrait};

use crate::auth::logging::{log_failed_login, log_registration, log_successful_login};
use crate::auth::{PasswordHasher, TokenConfig};
use crate::entities::conversions::convert_to_domain_user;
use crate::entities::{format_validation_errors, normalize_email, AuthenticatedUser, RegisterUser, User};

/// User service errors
#[derive(Debug, Error)]
pub enum UserServiceError {
    /// Input failed validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Another account already uses the email
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Storage, hashing or token failure
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Registration and login
#[async_trait]
pub trait UserServiceTrait {
    /// Register a new user
    async fn register(&self, request: RegisterUser) -> Result<User, UserServiceError>;

    /// Check credentials and issue an access token
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthenticatedUser, UserServiceError>;
}

/// User service for domain logic
pub struct UserService<R: UserRepositoryTrait> {
    repository: R,
    hasher: PasswordHasher,
    tokens: TokenConfig,
}

impl<R: UserRepositoryTrait> UserService<R> {
    pub fn new(repository: R, hasher: PasswordHasher, tokens: TokenConfig) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    fn map_repo_error(err: RepositoryError) -> UserServiceError {
        match err {
            RepositoryError::Conflict(msg) => UserServiceError::EmailTaken(msg),
            other => {
                error!("User repository failure: {}", other);
                UserServiceError::Internal(other.to_string())
            }
        }
    }
}

#[async_trait]
impl<R: UserRepositoryTrait + Send + Sync> UserServiceTrait for UserService<R> {
    async fn register(&self, request: RegisterUser) -> Result<User, UserServiceError> {
        let email = normalize_email(&request.email);
        let request = RegisterUser {
            name: request.name.trim().to_string(),
            email: email.clone(),
            password: request.password,
        };

        if let Err(errors) = request.validate() {
            let message = format_validation_errors(&errors);
            log_registration(&email, false, Some(&message));
            return Err(UserServiceError::Validation(message));
        }

        let password_hash = self.hasher.hash(&request.password).await.map_err(|e| {
            log_registration(&email, false, Some("password hashing failed"));
            UserServiceError::Internal(e.to_string())
        })?;

        let record = self
            .repository
            .create(NewUserRecord {
                name: request.name,
                email: email.clone(),
                password_hash,
            })
            .await
            .map_err(|e| {
                let err = Self::map_repo_error(e);
                log_registration(&email, false, Some(&err.to_string()));
                err
            })?;

        log_registration(&email, true, None);
        info!("Registered user {}", record.id);

        convert_to_domain_user(record).map_err(|e| UserServiceError::Internal(e.to_string()))
    }

    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthenticatedUser, UserServiceError> {
        let started = Instant::now();
        let email = normalize_email(email);
        let elapsed = |started: Instant| started.elapsed().as_millis() as u64;

        if email.is_empty() || password.is_empty() {
            log_failed_login(&email, "missing email or password", elapsed(started));
            return Err(UserServiceError::InvalidCredentials);
        }

        let record = match self.repository.find_by_email(&email).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!("Login for unknown email");
                log_failed_login(&email, "unknown email", elapsed(started));
                return Err(UserServiceError::InvalidCredentials);
            }
            Err(e) => {
                log_failed_login(&email, "storage failure", elapsed(started));
                return Err(Self::map_repo_error(e));
            }
        };

        let matches = self
            .hasher
            .verify(password, &record.password_hash)
            .await
            .map_err(|e| {
                error!("Password verification failed for user {}: {}", record.id, e);
                log_failed_login(&email, "password verification error", elapsed(started));
                UserServiceError::Internal(e.to_string())
            })?;

        if !matches {
            log_failed_login(&email, "wrong password", elapsed(started));
            return Err(UserServiceError::InvalidCredentials);
        }

        let access_token = self
            .tokens
            .generate_token(&record.id, &record.email)
            .map_err(|e| {
                log_failed_login(&email, "token generation failed", elapsed(started));
                UserServiceError::Internal(e.to_string())
            })?;

        log_successful_login(&record.id, elapsed(started));

        let user = convert_to_domain_user(record).map_err(|e| UserServiceError::Internal(e.to_string()))?;

        Ok(AuthenticatedUser {
            user,
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.tokens.expires_in(),
        })
    }
}

/// Create a user service on the default repository
pub fn create_default_user_service(
    hasher: PasswordHasher,
    tokens: TokenConfig,
) -> impl UserServiceTrait + Send + Sync {
    UserService::new(UserRepository::new(), hasher, tokens)
}
