//! Input validation for values that end up in store paths.
//!
//! Record ids from URL paths are spliced into Firestore document paths, so an
//! id containing `/` could address a different collection. Anything outside
//! the id alphabet is treated as an id that does not exist.

use crate::error::{ApiError, ApiResult};

/// Maximum accepted record id length.
pub const MAX_ID_LENGTH: usize = 128;

/// Check that a path id only uses characters valid in a record id.
pub fn is_valid_record_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LENGTH
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Validate a path id, failing with `NotFound` carrying `not_found` otherwise.
pub fn record_id<'a>(id: &'a str, not_found: &str) -> ApiResult<&'a str> {
    if is_valid_record_id(id) {
        Ok(id)
    } else {
        Err(ApiError::not_found(not_found))
    }
}
