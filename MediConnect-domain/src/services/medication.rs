use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;
use validator::Validate;

use mediconnect_data::repository::{MedicationRepository, MedicationRepositoryTrait, RepositoryError};

use crate::entities::conversions::{convert_to_data_medication, convert_to_domain_medication};
use crate::entities::{format_validation_errors, CreateMedicationRequest, Medication, MedicationQuery};

/// Medication service errors
#[derive(Debug, Error)]
pub enum MedicationServiceError {
    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Repository error
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

/// Trait for medication service operations
#[async_trait]
pub trait MedicationServiceTrait {
    /// Validate and store a medication document
    async fn submit(&self, request: CreateMedicationRequest) -> Result<Medication, MedicationServiceError>;

    /// List stored medications matching the query
    async fn list(&self, query: MedicationQuery) -> Result<Vec<Medication>, MedicationServiceError>;
}

/// Medication service for domain logic
pub struct MedicationService<R: MedicationRepositoryTrait> {
    repository: R,
}

impl<R: MedicationRepositoryTrait> MedicationService<R> {
    /// Create a new medication service
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    fn map_repo_error(err: RepositoryError) -> MedicationServiceError {
        error!("Medication repository failure: {}", err);
        MedicationServiceError::RepositoryError(err.to_string())
    }
}

#[async_trait]
impl<R: MedicationRepositoryTrait + Send + Sync> MedicationServiceTrait for MedicationService<R> {
    async fn submit(&self, request: CreateMedicationRequest) -> Result<Medication, MedicationServiceError> {
        request
            .validate()
            .map_err(|e| MedicationServiceError::ValidationError(format_validation_errors(&e)))?;

        let medication = request.into_medication(Uuid::new_v4().to_string(), Utc::now());
        let record = convert_to_data_medication(&medication)
            .map_err(|e| MedicationServiceError::ValidationError(e.to_string()))?;

        self.repository.create(record).await.map_err(Self::map_repo_error)?;
        info!("Stored medication {} ({})", medication.id, medication.name);

        Ok(medication)
    }

    async fn list(&self, query: MedicationQuery) -> Result<Vec<Medication>, MedicationServiceError> {
        let records = self.repository.list_all().await.map_err(Self::map_repo_error)?;

        let medications = records
            .into_iter()
            .map(convert_to_domain_medication)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!("Stored medication could not be read: {}", e);
                MedicationServiceError::RepositoryError(e.to_string())
            })?;

        let selected = query.apply(medications);
        debug!("Listing {} medications", selected.len());

        Ok(selected)
    }
}

/// Create a medication service on the default repository
pub fn create_default_medication_service() -> impl MedicationServiceTrait + Send + Sync {
    MedicationService::new(MedicationRepository::new())
}
