use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use mockall::mock;
use serde_json::{json, Value};
use tower::ServiceExt;

use mediconnect_api::api::{create_router, AppState};
use mediconnect_domain::entities::{
    AuthenticatedUser, CreateMedicationRequest, Medication, MedicationQuery, RegisterUser, User,
};
use mediconnect_domain::services::{
    MedicationServiceError, MedicationServiceTrait, UserServiceError, UserServiceTrait,
};
use mediconnect_domain::testing::MockHealthService;

mock! {
    pub Users {}

    #[async_trait]
    impl UserServiceTrait for Users {
        async fn register(&self, request: RegisterUser) -> Result<User, UserServiceError>;
        async fn authenticate(&self, email: &str, password: &str) -> Result<AuthenticatedUser, UserServiceError>;
    }
}

mock! {
    pub Medications {}

    #[async_trait]
    impl MedicationServiceTrait for Medications {
        async fn submit(&self, request: CreateMedicationRequest) -> Result<Medication, MedicationServiceError>;
        async fn list(&self, query: MedicationQuery) -> Result<Vec<Medication>, MedicationServiceError>;
    }
}

fn app(users: MockUsers, medications: MockMedications) -> axum::Router {
    create_router(
        AppState::new(Arc::new(users), Arc::new(medications)),
        Arc::new(MockHealthService::new()),
    )
}

async fn post(app: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_storage_failure_during_login_is_500() {
    let mut users = MockUsers::new();
    users
        .expect_authenticate()
        .times(1)
        .returning(|_, _| Err(UserServiceError::Internal("database is locked".to_string())));

    let (status, body) = post(
        app(users, MockMedications::new()),
        "/api/login",
        json!({ "email": "asha@example.com", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
}

#[tokio::test]
async fn test_login_passes_credentials_through() {
    let mut users = MockUsers::new();
    users
        .expect_authenticate()
        .withf(|email, password| email.to_string() == "asha@example.com" && password.to_string() == "password123")
        .returning(|_, _| Err(UserServiceError::InvalidCredentials));

    let (status, body) = post(
        app(users, MockMedications::new()),
        "/api/login",
        json!({ "email": "asha@example.com", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_registration_internal_failure_is_500() {
    let mut users = MockUsers::new();
    users
        .expect_register()
        .returning(|_| Err(UserServiceError::Internal("hashing failed".to_string())));

    let (status, _) = post(
        app(users, MockMedications::new()),
        "/api/register",
        json!({ "name": "Asha", "email": "asha@example.com", "password": "password123" }),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_listing_storage_failure_is_500() {
    let mut medications = MockMedications::new();
    medications
        .expect_list()
        .returning(|_| Err(MedicationServiceError::RepositoryError("disk I/O error".to_string())));

    let response = app(MockUsers::new(), medications)
        .oneshot(
            Request::builder()
                .uri("/api/medications")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
