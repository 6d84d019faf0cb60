use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, instrument, warn};

use mediconnect_domain::services::{UserServiceError, UserServiceTrait};

use crate::entities::auth::{PublicLoginRequest, PublicLoginResponse, PublicRegistrationRequest};
use crate::entities::common::{ErrorResponse, MessageResponse};

/// Service type for dependency injection
pub type UserService = Arc<dyn UserServiceTrait + Send + Sync>;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = PublicRegistrationRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Invalid request or email already registered", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(service, payload))]
pub async fn register(
    State(service): State<UserService>,
    payload: Result<Json<PublicRegistrationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload.map_err(|rejection| {
        warn!("Rejected registration body: {}", rejection.body_text());
        ErrorResponse::from(rejection)
    })?;

    match service.register(request.into()).await {
        Ok(user) => {
            info!("User registered: {}", user.id);
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse::new("User registered successfully")),
            ))
        }
        Err(UserServiceError::Validation(msg)) => Err(ErrorResponse::validation_error(msg, None)),
        Err(UserServiceError::EmailTaken(_)) => Err(ErrorResponse::conflict(
            "A user with this email already exists",
        )),
        Err(e) => {
            error!("Registration failed: {}", e);
            Err(ErrorResponse::internal_error(e.to_string()))
        }
    }
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = PublicLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = PublicLoginResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Invalid email or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(service, payload))]
pub async fn login(
    State(service): State<UserService>,
    payload: Result<Json<PublicLoginRequest>, JsonRejection>,
) -> Result<Json<PublicLoginResponse>, ErrorResponse> {
    let Json(request) = payload.map_err(ErrorResponse::from)?;

    match service.authenticate(&request.email, &request.password).await {
        Ok(auth) => Ok(Json(PublicLoginResponse::from(auth))),
        Err(UserServiceError::InvalidCredentials) => {
            Err(ErrorResponse::unauthorized("Invalid email or password"))
        }
        Err(UserServiceError::Validation(msg)) => Err(ErrorResponse::validation_error(msg, None)),
        Err(e) => {
            error!("Login failed: {}", e);
            Err(ErrorResponse::internal_error(e.to_string()))
        }
    }
}
