//! Model validation errors.

use thiserror::Error;
use validator::ValidationErrors;

pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while validating input or applying a state transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("All required fields must be provided")]
    MissingFields,

    #[error("Invalid work status")]
    InvalidWorkStatus,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("{0}")]
    Validation(String),

    #[error("You have already applied for this job")]
    AlreadyApplied,
}

impl ModelError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<ValidationErrors> for ModelError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{} {}", field, detail)
            })
            .collect();
        // HashMap iteration order is unstable
        messages.sort();
        Self::Validation(messages.join("; "))
    }
}
