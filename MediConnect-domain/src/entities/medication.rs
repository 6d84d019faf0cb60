use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[cfg(feature = "with-api")]
use utoipa::{IntoParams, ToSchema};

use super::dates;
use super::not_blank;

/// An organization that flagged a medication
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct FlaggingOrganization {
    /// Organization name, e.g. "WHO"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// When the organization flagged the medication
    #[serde(default, deserialize_with = "dates::deserialize_optional", skip_serializing_if = "Option::is_none")]
    pub flagged_at: Option<DateTime<Utc>>,
}

/// A documented effect on patient health
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct HealthImpact {
    /// Kind of impact, e.g. "Liver damage"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub impact_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// e.g. "Moderate", "Severe"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_level: Option<String>,
}

/// A reported adverse incident
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// When the incident happened. The stored field name keeps its historical spelling.
    #[serde(
        rename = "occuredAt",
        alias = "occurredAt",
        alias = "date",
        default,
        deserialize_with = "dates::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub occurred_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Severity level (1 = mild). Any number is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_patients: Option<f64>,
}

/// A safer alternative medication
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Alternative {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// An official warning about a medication
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Warning {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Issuing body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, deserialize_with = "dates::deserialize_optional", skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<DateTime<Utc>>,
}

/// A news item attached to a medication
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct RecentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A stored medication document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    /// Unique identifier assigned on submission
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    pub name: String,

    pub generic_name: String,

    pub category: String,

    /// Regulatory status, e.g. "Warning Issued" or "Banned"
    pub status: String,

    /// Severity of reported adverse effects (0-100)
    pub bad_effect_score: f64,

    /// How strongly organizations flag the medication (0-100)
    pub flagged_by_score: f64,

    pub organizations: Vec<FlaggingOrganization>,

    pub health_impacts: Vec<HealthImpact>,

    pub incidents: Vec<Incident>,

    pub alternatives: Vec<Alternative>,

    pub warnings: Vec<Warning>,

    pub recent_updates: Vec<RecentUpdate>,

    /// Who submitted the document
    pub added_by: String,

    /// When the document was stored
    pub created_at: DateTime<Utc>,
}

/// Payload for submitting a medication
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CreateMedicationRequest {
    #[validate(custom = "not_blank")]
    pub name: String,

    #[validate(custom = "not_blank")]
    pub generic_name: String,

    #[validate(custom = "not_blank")]
    pub category: String,

    #[validate(custom = "not_blank")]
    pub status: String,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub bad_effect_score: f64,

    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub flagged_by_score: f64,

    #[serde(default)]
    pub organizations: Vec<FlaggingOrganization>,

    #[serde(default)]
    pub health_impacts: Vec<HealthImpact>,

    #[serde(default)]
    pub incidents: Vec<Incident>,

    #[serde(default)]
    pub alternatives: Vec<Alternative>,

    #[serde(default)]
    pub warnings: Vec<Warning>,

    #[serde(default)]
    pub recent_updates: Vec<RecentUpdate>,

    #[validate(custom = "not_blank")]
    pub added_by: String,
}

impl CreateMedicationRequest {
    /// Turn a validated request into a document with the given identity
    pub fn into_medication(self, id: String, created_at: DateTime<Utc>) -> Medication {
        Medication {
            id,
            name: self.name,
            generic_name: self.generic_name,
            category: self.category,
            status: self.status,
            bad_effect_score: self.bad_effect_score,
            flagged_by_score: self.flagged_by_score,
            organizations: self.organizations,
            health_impacts: self.health_impacts,
            incidents: self.incidents,
            alternatives: self.alternatives,
            warnings: self.warnings,
            recent_updates: self.recent_updates,
            added_by: self.added_by,
            created_at,
        }
    }
}

/// Score used to order medication listings (highest first)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub enum MedicationSort {
    BadEffectScore,
    FlaggedByScore,
}

/// Optional filters for listing medications
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "with-api", derive(ToSchema, IntoParams))]
#[cfg_attr(feature = "with-api", into_params(parameter_in = Query))]
#[serde(rename_all = "camelCase")]
pub struct MedicationQuery {
    /// Case-insensitive substring of the name or category
    pub search: Option<String>,

    /// Exact category ("all" disables the filter)
    pub category: Option<String>,

    /// Organization that flagged the medication ("all" disables the filter)
    pub organization: Option<String>,

    /// Exact status ("all" disables the filter)
    pub status: Option<String>,

    /// Sort by a score, highest first. Insertion order when absent.
    pub sort_by: Option<MedicationSort>,
}

/// A filter value of "" or "all" means no filter
fn active_filter(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

impl MedicationQuery {
    /// Whether a medication passes every active filter
    pub fn matches(&self, medication: &Medication) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = medication.name.to_lowercase().contains(&needle)
                || medication.category.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(category) = active_filter(&self.category) {
            if medication.category != category {
                return false;
            }
        }

        if let Some(organization) = active_filter(&self.organization) {
            let flagged = medication
                .organizations
                .iter()
                .any(|o| o.organization.as_deref() == Some(organization));
            if !flagged {
                return false;
            }
        }

        if let Some(status) = active_filter(&self.status) {
            if medication.status != status {
                return false;
            }
        }

        true
    }

    /// Filter and order a list of medications
    pub fn apply(&self, medications: Vec<Medication>) -> Vec<Medication> {
        let mut selected: Vec<Medication> = medications
            .into_iter()
            .filter(|m| self.matches(m))
            .collect();

        match self.sort_by {
            Some(MedicationSort::BadEffectScore) => {
                selected.sort_by(|a, b| b.bad_effect_score.total_cmp(&a.bad_effect_score));
            }
            Some(MedicationSort::FlaggedByScore) => {
                selected.sort_by(|a, b| b.flagged_by_score.total_cmp(&a.flagged_by_score));
            }
            None => {}
        }

        selected
    }
}
