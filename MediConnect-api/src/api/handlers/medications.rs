use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Json, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, instrument};

use mediconnect_domain::services::{MedicationServiceError, MedicationServiceTrait};

use crate::entities::common::ErrorResponse;
use crate::entities::{CreateMedicationRequest, Medication, MedicationQuery};

/// Service type for dependency injection
pub type MedicationService = Arc<dyn MedicationServiceTrait + Send + Sync>;

fn map_service_error(err: MedicationServiceError) -> ErrorResponse {
    match err {
        MedicationServiceError::ValidationError(msg) => ErrorResponse::validation_error(msg, None),
        MedicationServiceError::RepositoryError(msg) => {
            error!("Medication storage failed: {}", msg);
            ErrorResponse::internal_error(msg)
        }
    }
}

/// Submit a medication document
#[utoipa::path(
    post,
    path = "/api/medications",
    request_body = CreateMedicationRequest,
    responses(
        (status = 201, description = "Medication stored", body = Medication),
        (status = 400, description = "Invalid document", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service, payload))]
pub async fn create_medication(
    State(service): State<MedicationService>,
    payload: Result<Json<CreateMedicationRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ErrorResponse> {
    let Json(request) = payload.map_err(ErrorResponse::from)?;

    let medication = service.submit(request).await.map_err(map_service_error)?;
    info!("Created medication {}", medication.id);

    Ok((StatusCode::CREATED, Json(medication)))
}

/// List medications, optionally filtered and sorted
#[utoipa::path(
    get,
    path = "/api/medications",
    params(MedicationQuery),
    responses(
        (status = 200, description = "Stored medications", body = [Medication]),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    ),
    tag = "medications"
)]
#[instrument(skip(service, query))]
pub async fn list_medications(
    State(service): State<MedicationService>,
    query: Result<Query<MedicationQuery>, QueryRejection>,
) -> Result<Json<Vec<Medication>>, ErrorResponse> {
    let Query(query) = query.map_err(ErrorResponse::from)?;

    let medications = service.list(query).await.map_err(map_service_error)?;
    Ok(Json(medications))
}
