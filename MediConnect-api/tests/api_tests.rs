use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use mediconnect_api::api::{create_router, AppState};
use mediconnect_api::config::Environment;
use mediconnect_data::database::DatabasePool;
use mediconnect_data::repository::{MedicationRepository, UserRepository};
use mediconnect_domain::auth::PasswordHasher;
use mediconnect_domain::health::ComponentStatus;
use mediconnect_domain::services::{MedicationService, UserService};
use mediconnect_domain::testing::{
    mock_medication_service, mock_user_service, sample_medication_request, sample_registration,
    test_token_config, MockHealthService, MockMedicationRepository, MockUserRepository,
};

// Initialize tracing once for all tests
static INIT: std::sync::Once = std::sync::Once::new();
fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("info")
            .with_test_writer()
            .try_init();
    });
}

/// Router on fresh in-memory storage
fn test_app() -> Router {
    initialize();

    let state = AppState::new(
        Arc::new(UserService::new(
            UserRepository::in_memory(),
            PasswordHasher::new(4),
            test_token_config(),
        )),
        Arc::new(MedicationService::new(MedicationRepository::in_memory())),
    );

    create_router(state, Arc::new(MockHealthService::new()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

fn registration(email: &str) -> Value {
    json!({ "name": "Asha Rao", "email": email, "password": "password123" })
}

fn medication(name: &str, category: &str, organization: &str, bad: f64, flagged: f64) -> Value {
    json!({
        "name": name,
        "genericName": format!("{} generic", name),
        "category": category,
        "status": "Warning Issued",
        "badEffectScore": bad,
        "flaggedByScore": flagged,
        "organizations": [{ "organization": organization, "flaggedAt": "2023-10-26" }],
        "healthImpacts": [{ "type": "Liver", "severity": "Moderate", "evidenceLevel": "Strong" }],
        "incidents": [{ "date": "2023-10-26", "description": "Overdose", "severity": 2.5, "location": "USA", "affectedPatients": 100 }],
        "alternatives": [{ "name": "Safer", "category": category }],
        "warnings": [{ "content": "Avoid", "source": "FDA", "issuedAt": "2023-11-01T00:00:00Z" }],
        "recentUpdates": [{ "title": "Update", "description": "Label change" }],
        "addedBy": "admin"
    })
}

#[tokio::test]
async fn test_register_then_duplicate_email_is_rejected() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/api/register", Some(registration("asha@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");

    let (status, body) = send(&app, Method::POST, "/api/register", Some(registration("asha@example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(&app, Method::POST, "/api/register", Some(registration("ASHA@Example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_validation_and_malformed_body() {
    let app = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/register",
        Some(json!({ "name": "Asha", "email": "not-an-email", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, body) = send(&app, Method::POST, "/api/register", Some(json!({ "email": "a@example.com" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_login_success_and_failures() {
    let app = test_app();
    send(&app, Method::POST, "/api/register", Some(registration("asha@example.com"))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "asha@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["email"], "asha@example.com");
    assert!(body["user"].get("passwordHash").is_none());

    let token = body["token"].as_str().unwrap();
    let claims = test_token_config().validate_token(token).unwrap();
    assert_eq!(claims.sub, body["user"]["id"].as_str().unwrap());

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "asha@example.com", "password": "wrong-password" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "nobody@example.com", "password": "password123" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["message"], "Invalid email or password");
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_submitted_medication_round_trips_through_listing() {
    let app = test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/medications",
        Some(medication("Medication A", "Analgesics", "WHO", 80.0, 70.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["_id"].is_string());
    assert!(created["createdAt"].is_string());
    assert_eq!(created["incidents"][0]["occuredAt"], "2023-10-26T00:00:00Z");
    assert_eq!(created["healthImpacts"][0]["type"], "Liver");
    assert_eq!(created["incidents"][0]["severity"], json!(2.5));

    let (status, listed) = send(&app, Method::GET, "/api/medications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn test_missing_medication_fields_are_rejected() {
    let app = test_app();

    let mut incomplete = medication("Medication A", "Analgesics", "WHO", 80.0, 70.0);
    incomplete.as_object_mut().unwrap().remove("genericName");
    let (status, _) = send(&app, Method::POST, "/api/medications", Some(incomplete)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/medications",
        Some(medication("", "Analgesics", "WHO", 180.0, 70.0)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (_, listed) = send(&app, Method::GET, "/api/medications", None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn test_listing_filters_and_sort() {
    let app = test_app();
    for doc in [
        medication("Medication A", "Analgesics", "WHO", 80.0, 70.0),
        medication("Medication B", "Antibiotics", "FDA", 95.0, 60.0),
        medication("Painaway", "Analgesics", "FDA", 40.0, 90.0),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/medications", Some(doc)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let names = |body: &Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap().to_string())
            .collect()
    };

    let (_, body) = send(&app, Method::GET, "/api/medications?category=Analgesics&sortBy=flaggedByScore", None).await;
    assert_eq!(names(&body), vec!["Painaway", "Medication A"]);

    let (_, body) = send(&app, Method::GET, "/api/medications?organization=FDA&category=all", None).await;
    assert_eq!(names(&body), vec!["Medication B", "Painaway"]);

    let (_, body) = send(&app, Method::GET, "/api/medications?search=medication&sortBy=badEffectScore", None).await;
    assert_eq!(names(&body), vec!["Medication B", "Medication A"]);

    let (status, body) = send(&app, Method::GET, "/api/medications?sortBy=price", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/medications"].is_object());
    assert!(body["paths"]["/api/login"].is_object());
}

#[tokio::test]
async fn test_degraded_health_is_503() {
    initialize();
    let state = AppState::new(
        Arc::new(UserService::new(
            UserRepository::in_memory(),
            PasswordHasher::new(4),
            test_token_config(),
        )),
        Arc::new(MedicationService::new(MedicationRepository::in_memory())),
    );
    let app = create_router(state, Arc::new(MockHealthService::new().with_degraded_database()));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["components"]["database"]["status"], "degraded");
}

#[tokio::test]
async fn test_security_and_cors_headers() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/api/medications")
                .header(header::ORIGIN, "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_sqlite_storage_round_trips_documents() {
    initialize();
    let pool = DatabasePool::in_memory().unwrap();
    let state = AppState::new(
        Arc::new(UserService::new(
            UserRepository::with_pool(pool.clone()),
            PasswordHasher::new(4),
            test_token_config(),
        )),
        Arc::new(MedicationService::new(MedicationRepository::with_pool(pool))),
    );
    let app = create_router(state, Arc::new(MockHealthService::new()));

    let mut doc = medication("Medication A", "Analgesics", "WHO", 80.0, 70.0);
    doc["organizations"][0]["flaggedAt"] = json!("2023-10-26T08:15:30.123456789Z");
    let (status, created) = send(&app, Method::POST, "/api/medications", Some(doc)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["organizations"][0]["flaggedAt"], "2023-10-26T08:15:30.123456789Z");

    let (status, listed) = send(&app, Method::GET, "/api/medications", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([created]));

    let (status, _) = send(&app, Method::POST, "/api/register", Some(registration("asha@example.com"))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, body) = send(&app, Method::POST, "/api/register", Some(registration("Asha@Example.com"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({ "email": "asha@example.com", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_router_on_mock_repositories() {
    initialize();
    let users = MockUserRepository::new();
    let medications = MockMedicationRepository::new();
    let state = AppState::new(
        Arc::new(mock_user_service(users.clone())),
        Arc::new(mock_medication_service(medications.clone())),
    );
    let app = create_router(state, Arc::new(MockHealthService::new()));

    let registration = serde_json::to_value(sample_registration("test@example.com")).unwrap();
    let (status, _) = send(&app, Method::POST, "/api/register", Some(registration)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(users.stored().len(), 1);

    let request = serde_json::to_value(sample_medication_request("Medication A")).unwrap();
    let (status, created) = send(&app, Method::POST, "/api/medications", Some(request)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["incidents"][0]["severity"], json!(2.5));

    let (_, listed) = send(&app, Method::GET, "/api/medications?organization=WHO", None).await;
    assert_eq!(listed, json!([created]));
}

#[tokio::test]
async fn test_unhealthy_database_is_500_and_reports_environment() {
    initialize();
    let state = AppState::new(
        Arc::new(mock_user_service(MockUserRepository::new())),
        Arc::new(mock_medication_service(MockMedicationRepository::new())),
    )
    .with_environment(Environment("staging".to_string()));
    let health = MockHealthService::new()
        .with_unhealthy_database()
        .with_component("api", ComponentStatus::Degraded, Some("slow responses".to_string()));
    let app = create_router(state, Arc::new(health));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["environment"], "staging");
    assert_eq!(body["components"]["database"]["status"], "error");
    assert_eq!(body["components"]["api"]["status"], "degraded");
    assert_eq!(body["components"]["api"]["message"], "slow responses");
}
