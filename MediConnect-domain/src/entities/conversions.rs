//! Conversion functions between domain entities and data models.
//!
//! Follows the `convert_to_[target_layer]_[model_name]` naming used across
//! the workspace.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use mediconnect_data::models::medication::MedicationRecord;
use mediconnect_data::models::user::UserRecord;

use crate::entities::{Medication, User};

/// A stored row could not be turned into a domain entity (or back)
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("invalid timestamp '{value}': {reason}")]
    Timestamp { value: String, reason: String },

    #[error("invalid JSON in field {field}: {reason}")]
    Json { field: &'static str, reason: String },
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ConversionError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ConversionError::Timestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn to_json<T: Serialize>(field: &'static str, value: &T) -> Result<String, ConversionError> {
    serde_json::to_string(value).map_err(|e| ConversionError::Json {
        field,
        reason: e.to_string(),
    })
}

fn from_json<T: DeserializeOwned>(field: &'static str, raw: &str) -> Result<Vec<T>, ConversionError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).map_err(|e| ConversionError::Json {
        field,
        reason: e.to_string(),
    })
}

/// Convert from data model to domain entity for a user, dropping the hash
pub fn convert_to_domain_user(record: UserRecord) -> Result<User, ConversionError> {
    Ok(User {
        created_at: parse_timestamp(&record.created_at)?,
        id: record.id,
        name: record.name,
        email: record.email,
    })
}

/// Convert from domain entity to data model for a medication
pub fn convert_to_data_medication(medication: &Medication) -> Result<MedicationRecord, ConversionError> {
    Ok(MedicationRecord {
        id: medication.id.clone(),
        name: medication.name.clone(),
        generic_name: medication.generic_name.clone(),
        category: medication.category.clone(),
        status: medication.status.clone(),
        bad_effect_score: medication.bad_effect_score,
        flagged_by_score: medication.flagged_by_score,
        organizations: to_json("organizations", &medication.organizations)?,
        health_impacts: to_json("health_impacts", &medication.health_impacts)?,
        incidents: to_json("incidents", &medication.incidents)?,
        alternatives: to_json("alternatives", &medication.alternatives)?,
        warnings: to_json("warnings", &medication.warnings)?,
        recent_updates: to_json("recent_updates", &medication.recent_updates)?,
        added_by: medication.added_by.clone(),
        created_at: medication.created_at.to_rfc3339(),
    })
}

/// Convert from data model to domain entity for a medication
pub fn convert_to_domain_medication(record: MedicationRecord) -> Result<Medication, ConversionError> {
    Ok(Medication {
        organizations: from_json("organizations", &record.organizations)?,
        health_impacts: from_json("health_impacts", &record.health_impacts)?,
        incidents: from_json("incidents", &record.incidents)?,
        alternatives: from_json("alternatives", &record.alternatives)?,
        warnings: from_json("warnings", &record.warnings)?,
        recent_updates: from_json("recent_updates", &record.recent_updates)?,
        created_at: parse_timestamp(&record.created_at)?,
        id: record.id,
        name: record.name,
        generic_name: record.generic_name,
        category: record.category,
        status: record.status,
        bad_effect_score: record.bad_effect_score,
        flagged_by_score: record.flagged_by_score,
        added_by: record.added_by,
    })
}
