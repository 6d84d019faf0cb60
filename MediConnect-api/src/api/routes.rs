use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::FromRef,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::debug;

use mediconnect_domain::services::{create_default_medication_service, create_default_user_service};

use crate::api::handlers::auth::UserService;
use crate::api::handlers::health::{self, HealthServiceRef};
use crate::api::handlers::medications::{self, MedicationService};
use crate::api::handlers::auth;
use crate::config::{AppConfig, Environment};
use crate::openapi::configure_swagger_routes;

/// Services shared by the handlers
#[derive(Clone, FromRef)]
pub struct AppState {
    pub users: UserService,
    pub medications: MedicationService,
    pub environment: Environment,
}

impl AppState {
    pub fn new(users: UserService, medications: MedicationService) -> Self {
        Self {
            users,
            medications,
            environment: Environment::default(),
        }
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Services on the default repositories (database pool if initialised, memory otherwise)
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(create_default_user_service(
                config.password_hasher(),
                config.token.clone(),
            )),
            Arc::new(create_default_medication_service()),
        )
        .with_environment(config.environment.clone())
    }
}

/// Create the application router with default services
pub fn create_app(config: &AppConfig) -> Router {
    create_router(AppState::from_config(config), health::create_health_service())
}

/// Create the application router around the given services
pub fn create_router(state: AppState, health_service: HealthServiceRef) -> Router {
    debug!("Creating application router");

    let api_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route(
            "/medications",
            get(medications::list_medications).post(medications::create_medication),
        );

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .layer(Extension(health_service));

    let app = Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
        .with_state(state);

    let app = add_swagger_ui(app);
    let app = configure_security(app);

    // Initialize health check service startup time
    health::initialize_server_start_time();

    app.layer(TraceLayer::new_for_http())
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}

/// Permissive CORS plus standard security headers
pub fn configure_security(app: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static("x-permitted-cross-domain-policies"),
            HeaderValue::from_static("none"),
        ));

    app.layer(cors).layer(security_headers)
}
