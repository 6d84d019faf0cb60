use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Configure Swagger UI endpoints
pub fn configure_swagger_routes() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::medications::create_medication,
        crate::api::handlers::medications::list_medications,
    ),
    components(
        schemas(
            crate::entities::common::ErrorResponse,
            crate::entities::common::MessageResponse,
            crate::entities::auth::PublicRegistrationRequest,
            crate::entities::auth::PublicLoginRequest,
            crate::entities::auth::PublicLoginResponse,
            crate::entities::auth::PublicUserInfo,
            crate::entities::Medication,
            crate::entities::CreateMedicationRequest,
            crate::entities::MedicationSort,
            crate::entities::FlaggingOrganization,
            crate::entities::HealthImpact,
            crate::entities::Incident,
            crate::entities::Alternative,
            crate::entities::Warning,
            crate::entities::RecentUpdate,
            crate::api::handlers::health::HealthResponse,
            crate::api::handlers::health::ComponentStatus,
            crate::api::handlers::health::ComponentHealthStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "auth", description = "Registration and login"),
        (name = "medications", description = "Flagged medication documents")
    ),
    info(
        title = "MediConnect API",
        version = "0.1.0",
        description = "Backend for the MediConnect application: accounts and flagged medications",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
    ),
    servers(
        (url = "/", description = "Local development server")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_doc_generation() {
        let openapi = ApiDoc::openapi();

        assert_eq!(openapi.info.title, "MediConnect API");
        assert_eq!(openapi.info.version, "0.1.0");

        let tags = openapi.tags.as_ref().unwrap();
        assert!(tags.iter().any(|tag| tag.name == "auth"));
        assert!(tags.iter().any(|tag| tag.name == "medications"));

        for path in ["/health", "/api/register", "/api/login", "/api/medications"] {
            assert!(openapi.paths.paths.contains_key(path), "missing path {}", path);
        }

        let schemas = &openapi.components.as_ref().unwrap().schemas;
        assert!(schemas.contains_key("Medication"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
