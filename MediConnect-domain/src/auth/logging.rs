use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of authentication events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthEventType {
    /// Successful login
    Login,
    /// Failed login attempt
    FailedLogin,
    /// User registration attempt
    Registration,
    /// Token validation
    TokenValidation,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::Login => write!(f, "LOGIN"),
            AuthEventType::FailedLogin => write!(f, "FAILED_LOGIN"),
            AuthEventType::Registration => write!(f, "REGISTRATION"),
            AuthEventType::TokenValidation => write!(f, "TOKEN_VALIDATION"),
        }
    }
}

/// Authentication event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    pub event_type: AuthEventType,
    /// User ID or email, when known
    pub user: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub details: Option<String>,
    /// Duration of the operation in milliseconds
    pub duration_ms: Option<u64>,
    /// password, jwt, ...
    pub auth_method: Option<String>,
}

impl AuthEvent {
    /// Create a new authentication event
    pub fn new(event_type: AuthEventType, user: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user: user.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            duration_ms: None,
            auth_method: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }
}

/// Emit one structured record for an authentication event
pub fn log_auth_event(event: AuthEvent) {
    let user = event.user.as_deref().unwrap_or("anonymous");
    let status = if event.success { "SUCCESS" } else { "FAILURE" };
    let details = event.details.as_deref().unwrap_or("");
    let method = event.auth_method.as_deref().unwrap_or("-");

    if event.success {
        info!(
            event_type = %event.event_type,
            user,
            auth_method = method,
            duration_ms = event.duration_ms,
            "AUTH-LOG [{}] [{}] [{}] [{}] {}",
            event.event_type,
            user,
            status,
            event.timestamp.to_rfc3339(),
            details
        );
    } else {
        warn!(
            event_type = %event.event_type,
            user,
            auth_method = method,
            duration_ms = event.duration_ms,
            "AUTH-LOG [{}] [{}] [{}] [{}] {}",
            event.event_type,
            user,
            status,
            event.timestamp.to_rfc3339(),
            details
        );
    }
}

/// Log a successful login
pub fn log_successful_login(user_id: &str, duration_ms: u64) {
    let event = AuthEvent::new(AuthEventType::Login, Some(user_id), true)
        .with_auth_method("password")
        .with_duration(duration_ms);

    log_auth_event(event);
}

/// Log a failed login attempt
pub fn log_failed_login(email: &str, reason: &str, duration_ms: u64) {
    let event = AuthEvent::new(AuthEventType::FailedLogin, Some(email), false)
        .with_details(reason)
        .with_auth_method("password")
        .with_duration(duration_ms);

    log_auth_event(event);
}

/// Log a registration attempt
pub fn log_registration(email: &str, success: bool, details: Option<&str>) {
    let mut event = AuthEvent::new(AuthEventType::Registration, Some(email), success);

    if let Some(d) = details {
        event = event.with_details(d);
    }

    log_auth_event(event);
}

/// Log a token validation
pub fn log_token_validation(user_id: Option<&str>, success: bool, details: Option<&str>) {
    let mut event = AuthEvent::new(AuthEventType::TokenValidation, user_id, success)
        .with_auth_method("jwt");

    if let Some(d) = details {
        event = event.with_details(d);
    }

    log_auth_event(event);
}
