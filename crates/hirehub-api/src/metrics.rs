//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "hirehub_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "hirehub_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "hirehub_http_requests_in_flight";

    // Account metrics
    pub const REGISTRATIONS_TOTAL: &str = "hirehub_registrations_total";
    pub const LOGINS_TOTAL: &str = "hirehub_logins_total";
    pub const AUTH_FAILURES_TOTAL: &str = "hirehub_auth_failures_total";

    // Job metrics
    pub const APPLICATIONS_TOTAL: &str = "hirehub_applications_total";
    pub const JOBS_CREATED_TOTAL: &str = "hirehub_jobs_created_total";

    // Rate limiting metrics
    pub const RATE_LIMIT_HITS_TOTAL: &str = "hirehub_rate_limit_hits_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record a completed registration.
pub fn record_registration(kind: &str) {
    counter!(names::REGISTRATIONS_TOTAL, "kind" => kind.to_string()).increment(1);
}

/// Record a login attempt.
pub fn record_login(kind: &str, success: bool) {
    let labels = [
        ("kind", kind.to_string()),
        ("outcome", if success { "success" } else { "failure" }.to_string()),
    ];
    counter!(names::LOGINS_TOTAL, &labels).increment(1);
}

/// Record a rejected bearer token.
pub fn record_auth_failure(kind: &str, reason: &str) {
    let labels = [("kind", kind.to_string()), ("reason", reason.to_string())];
    counter!(names::AUTH_FAILURES_TOTAL, &labels).increment(1);
}

/// Record an apply attempt.
pub fn record_application(collection: &str, outcome: &str) {
    let labels = [
        ("collection", collection.to_string()),
        ("outcome", outcome.to_string()),
    ];
    counter!(names::APPLICATIONS_TOTAL, &labels).increment(1);
}

/// Record created postings.
pub fn record_jobs_created(collection: &str, count: usize) {
    counter!(names::JOBS_CREATED_TOTAL, "collection" => collection.to_string())
        .increment(count as u64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", endpoint.to_string())];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

static UUID_SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .expect("valid metrics path pattern")
});

static ID_AFTER_RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/(jobs|trending-jobs|companies)/([A-Za-z0-9_-]+)")
        .expect("valid metrics path pattern")
});

/// Sanitize path for metrics labels (remove IDs, etc.).
fn sanitize_path(path: &str) -> String {
    let path = UUID_SEGMENT.replace_all(path, ":id");
    ID_AFTER_RESOURCE
        .replace_all(&path, |caps: &regex::Captures<'_>| match &caps[2] {
            "recruiter" | "category" | "bulk" | ":id" => caps[0].to_string(),
            _ => format!("/{}/:id", &caps[1]),
        })
        .into_owned()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}
