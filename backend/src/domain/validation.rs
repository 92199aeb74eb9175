//! Field checks applied once, at the repository boundary.

use super::dates::calendar_date;
use super::errors::ValidationError;

/// Trimmed value of a required text field, or `error` if it is blank
pub fn require_text(value: &str, error: ValidationError) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    Ok(trimmed.to_string())
}

/// Blank optional input is stored as absent
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A date or date-time field whose calendar date can be read
pub fn require_date(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if calendar_date(trimmed).is_none() {
        return Err(ValidationError::InvalidDate {
            field,
            value: value.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
