//! Error classification and config tests for the Firestore client.

use std::time::Duration;

use serial_test::serial;

use crate::client::FirestoreConfig;
use crate::error::FirestoreError;

#[test]
fn test_error_from_http_status_429() {
    let err = FirestoreError::from_http_status(429, "rate limited");
    assert!(matches!(err, FirestoreError::RateLimited(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_error_from_http_status_5xx() {
    for status in [500, 502, 503] {
        let err = FirestoreError::from_http_status(status, "server error");
        assert!(matches!(err, FirestoreError::ServerError(s, _) if s == status));
        assert!(err.is_retryable());
    }
}

#[test]
fn test_error_from_http_status_400() {
    let err = FirestoreError::from_http_status(400, "bad request");
    assert!(matches!(err, FirestoreError::RequestFailed(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_failed_precondition_body_is_classified() {
    let err = FirestoreError::from_http_status(
        400,
        r#"{"error":{"code":400,"status":"FAILED_PRECONDITION"}}"#,
    );
    assert!(err.is_precondition_failed());
    assert!(!err.is_retryable());
}

#[test]
fn test_error_from_http_status_conflicts() {
    assert!(matches!(
        FirestoreError::from_http_status(409, "conflict"),
        FirestoreError::AlreadyExists(_)
    ));
    assert!(FirestoreError::from_http_status(412, "stale").is_precondition_failed());
    assert!(matches!(
        FirestoreError::from_http_status(404, "missing"),
        FirestoreError::NotFound(_)
    ));
}

#[test]
fn test_error_http_status_getter() {
    assert_eq!(FirestoreError::RateLimited(1000).http_status(), Some(429));
    assert_eq!(
        FirestoreError::ServerError(502, "bad gateway".into()).http_status(),
        Some(502)
    );
    assert_eq!(FirestoreError::NotFound("doc".into()).http_status(), Some(404));
}

#[test]
fn test_error_retry_after_ms() {
    assert_eq!(FirestoreError::RateLimited(5000).retry_after_ms(), Some(5000));
    assert_eq!(
        FirestoreError::ServerError(500, "error".into()).retry_after_ms(),
        None
    );
}

#[test]
#[serial]
fn test_config_validates_empty_project_id() {
    std::env::set_var("GCP_PROJECT_ID", "");
    std::env::remove_var("FIREBASE_PROJECT_ID");
    assert!(FirestoreConfig::from_env().is_err());
}

#[test]
#[serial]
fn test_config_accepts_firebase_project_id() {
    std::env::remove_var("GCP_PROJECT_ID");
    std::env::set_var("FIREBASE_PROJECT_ID", "firebase-project");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.project_id, "firebase-project");
}

#[test]
#[serial]
fn test_config_prefers_gcp_project_id() {
    std::env::set_var("GCP_PROJECT_ID", "gcp-project");
    std::env::set_var("FIREBASE_PROJECT_ID", "firebase-project");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.project_id, "gcp-project");
}

#[test]
#[serial]
fn test_config_parses_timeout_and_retry_env_vars() {
    std::env::set_var("GCP_PROJECT_ID", "test");
    std::env::set_var("FIRESTORE_CONNECT_TIMEOUT_SECS", "15");
    std::env::set_var("FIRESTORE_RETRY_BASE_MS", "50");
    std::env::set_var("FIRESTORE_RETRY_MAX_MS", "2000");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(15));
    assert_eq!(config.retry.base_delay_ms, 50);
    assert_eq!(config.retry.max_delay_ms, 2000);
    std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
    std::env::remove_var("FIRESTORE_RETRY_BASE_MS");
    std::env::remove_var("FIRESTORE_RETRY_MAX_MS");
}

#[test]
#[serial]
fn test_config_handles_invalid_env_values() {
    std::env::set_var("GCP_PROJECT_ID", "test");
    std::env::set_var("FIRESTORE_CONNECT_TIMEOUT_SECS", "not-a-number");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
}
