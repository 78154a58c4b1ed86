//! Required-field validation shared by every write endpoint.

use crate::error::DomainError;

/// Check that every named field is non-empty after trimming whitespace.
///
/// Returns a single [`DomainError::Validation`] naming all offending
/// fields, so a request missing several fields is rejected in one round
/// trip.
pub fn require_non_empty(fields: &[(&str, &str)]) -> Result<(), DomainError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}
