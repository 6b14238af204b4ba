//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::auth::{login_job_seeker, login_recruiter, register_job_seeker, register_recruiter};
use crate::handlers::companies::{
    create_company, delete_company, get_company, list_companies, update_company,
};
use crate::handlers::jobs::{
    apply_job, create_jobs, delete_job, get_job, recruiter_jobs, search_jobs, update_job,
};
use crate::handlers::recruiter::{get_profile, update_profile};
use crate::handlers::trending_jobs::{
    apply_trending_job, create_trending_job, create_trending_jobs_bulk, delete_trending_job,
    get_trending_job, list_by_category, list_trending_jobs, update_trending_job,
};
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Credential routes are rate limited per client IP
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));
    let credential_routes = Router::new()
        .route("/auth/register", post(register_job_seeker))
        .route("/auth/login", post(login_job_seeker))
        .route("/recruiter/register", post(register_recruiter))
        .route("/recruiter/login", post(login_recruiter))
        .layer(middleware::from_fn_with_state(rate_limiter, rate_limit_middleware));

    let recruiter_routes =
        Router::new().route("/recruiter/profile", get(get_profile).put(update_profile));

    let job_routes = Router::new()
        .route("/jobs", get(search_jobs).post(create_jobs))
        .route("/jobs/recruiter/jobs", get(recruiter_jobs))
        .route("/jobs/:id", get(get_job).put(update_job).delete(delete_job))
        .route("/jobs/:id/apply", post(apply_job));

    let trending_routes = Router::new()
        .route(
            "/trending-jobs",
            get(list_trending_jobs).post(create_trending_job),
        )
        .route("/trending-jobs/bulk", post(create_trending_jobs_bulk))
        .route("/trending-jobs/category/:category", get(list_by_category))
        .route(
            "/trending-jobs/:id",
            get(get_trending_job)
                .put(update_trending_job)
                .delete(delete_trending_job),
        )
        .route("/trending-jobs/:id/apply", post(apply_trending_job));

    let company_routes = Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/:id",
            get(get_company).put(update_company).delete(delete_company),
        );

    let api_routes = Router::new()
        .merge(credential_routes)
        .merge(recruiter_routes)
        .merge(job_routes)
        .merge(trending_routes)
        .merge(company_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = match metrics_handle {
        Some(handle) => Router::new().route("/metrics", get(move || async move { handle.render() })),
        None => Router::new(),
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
