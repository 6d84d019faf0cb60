use serde::{Deserialize, Serialize};

/// Storage model for a medication document.
///
/// Scalar fields map to columns; the nested lists are kept as JSON text
/// so the document shape is owned by the domain layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MedicationRecord {
    /// Unique identifier for the medication
    pub id: String,

    /// Brand or display name
    pub name: String,

    /// Generic (active ingredient) name
    pub generic_name: String,

    /// Therapeutic category
    pub category: String,

    /// Regulatory status, e.g. "Warning Issued" or "Banned"
    pub status: String,

    /// Severity of reported adverse effects
    pub bad_effect_score: f64,

    /// How strongly the medication is flagged by organizations
    pub flagged_by_score: f64,

    /// JSON array of flagging organizations
    pub organizations: String,

    /// JSON array of health impacts
    pub health_impacts: String,

    /// JSON array of incidents
    pub incidents: String,

    /// JSON array of alternatives
    pub alternatives: String,

    /// JSON array of warnings
    pub warnings: String,

    /// JSON array of recent updates
    pub recent_updates: String,

    /// Who submitted the record
    pub added_by: String,

    /// When the record was stored (RFC 3339)
    pub created_at: String,
}
