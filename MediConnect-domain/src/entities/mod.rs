// Domain entities and value objects
pub mod conversions;
pub mod dates;
pub mod medication;
pub mod user;

use validator::{ValidationError, ValidationErrors};

// Re-export common types for easier imports
pub use medication::{
    Alternative, CreateMedicationRequest, FlaggingOrganization, HealthImpact, Incident, Medication,
    MedicationQuery, MedicationSort, RecentUpdate, Warning,
};
pub use user::{normalize_email, AuthenticatedUser, Credentials, RegisterUser, User};

/// Reject strings that are empty or only whitespace
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

/// Flatten validator errors into a single readable message
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let error_msgs: Vec<String> = errors
                .iter()
                .map(|err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("invalid {}", field),
                })
                .collect();
            format!("{}: {}", field, error_msgs.join(", "))
        })
        .collect();

    // field_errors() is a HashMap; keep the message stable
    messages.sort();
    messages.join("; ")
}
