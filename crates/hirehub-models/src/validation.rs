//! Shared input validation helpers.

use validator::ValidateEmail;

use crate::error::{ModelError, ModelResult};

/// Trimmed value of a required registration field.
pub(crate) fn required(value: &Option<String>) -> ModelResult<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ModelError::MissingFields),
    }
}

/// Trimmed value of a required schema field, naming the field on failure.
pub(crate) fn required_text(field: &str, value: &str) -> ModelResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Trimmed value of an optional patch field; present-but-blank is rejected.
pub(crate) fn optional_text(field: &str, value: &Option<String>) -> ModelResult<Option<String>> {
    value.as_deref().map(|v| required_text(field, v)).transpose()
}

pub(crate) fn email(value: &str) -> ModelResult<String> {
    let trimmed = value.trim();
    if !trimmed.validate_email() {
        return Err(ModelError::InvalidEmail);
    }
    Ok(trimmed.to_string())
}

/// Trim each entry and drop blanks.
pub(crate) fn clean_list(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
