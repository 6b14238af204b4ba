//! Request handlers.

pub mod auth;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod recruiter;
pub mod trending_jobs;

pub use health::*;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};

/// Acknowledgment body for deletes and similar operations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Acknowledgment body for a successful application.
#[derive(Debug, Serialize)]
pub struct AppliedResponse {
    pub success: bool,
    pub message: &'static str,
}

impl AppliedResponse {
    pub fn new() -> Self {
        Self {
            success: true,
            message: "Successfully applied for the job",
        }
    }
}

impl Default for AppliedResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Deserialize an already-parsed JSON value, reporting shape errors as `BadRequest`.
pub(crate) fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::bad_request(e.to_string()))
}
