//! Trending job handlers. Everything is public except applying.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hirehub_firestore::client::MAX_COMMIT_WRITES;
use hirehub_firestore::{FirestoreError, Record};
use hirehub_models::{JobSeekerAccount, NewTrendingJob, TrendingCategory, TrendingJob, TrendingJobUpdate};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::Auth;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::handlers::jobs::applied;
use crate::handlers::{from_json, AppliedResponse, MessageResponse};
use crate::metrics;
use crate::security::record_id;
use crate::state::AppState;

const JOB_NOT_FOUND: &str = "Job not found";

#[derive(Debug, Serialize)]
pub struct BulkCreated {
    pub message: String,
    pub jobs: Vec<TrendingJob>,
}

/// GET /api/trending-jobs
pub async fn list_trending_jobs(State(state): State<AppState>) -> ApiResult<Json<Vec<TrendingJob>>> {
    Ok(Json(state.trending_jobs.list().await?))
}

/// GET /api/trending-jobs/category/:category
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<TrendingJob>>> {
    let category = TrendingCategory::parse(&category)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown category: {}", category)))?;
    Ok(Json(state.trending_jobs.list_by_category(category).await?))
}

/// POST /api/trending-jobs
pub async fn create_trending_job(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewTrendingJob>,
) -> ApiResult<(StatusCode, Json<TrendingJob>)> {
    let job = body.into_job(Utc::now())?;
    state.trending_jobs.create(&job).await?;

    metrics::record_jobs_created(TrendingJob::COLLECTION, 1);
    info!(job_id = %job.id, category = %job.category, "Trending job created");
    Ok((StatusCode::CREATED, Json(job)))
}

/// POST /api/trending-jobs/bulk
pub async fn create_trending_jobs_bulk(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<(StatusCode, Json<BulkCreated>)> {
    let Value::Array(items) = body else {
        return Err(ApiError::bad_request("Request body must be an array of jobs"));
    };
    if items.len() > MAX_COMMIT_WRITES {
        return Err(ApiError::bad_request(format!(
            "Cannot create more than {} jobs at once",
            MAX_COMMIT_WRITES
        )));
    }

    let now = Utc::now();
    let jobs = items
        .into_iter()
        .map(|item| from_json::<NewTrendingJob>(item)?.into_job(now).map_err(ApiError::from))
        .collect::<ApiResult<Vec<_>>>()?;

    state.trending_jobs.create_many(&jobs).await?;
    metrics::record_jobs_created(TrendingJob::COLLECTION, jobs.len());
    info!(count = jobs.len(), "Trending jobs created");

    Ok((
        StatusCode::CREATED,
        Json(BulkCreated {
            message: format!("{} jobs created successfully", jobs.len()),
            jobs,
        }),
    ))
}

/// GET /api/trending-jobs/:id
pub async fn get_trending_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TrendingJob>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    state
        .trending_jobs
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(JOB_NOT_FOUND))
}

/// PUT /api/trending-jobs/:id
pub async fn update_trending_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<TrendingJobUpdate>,
) -> ApiResult<Json<TrendingJob>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    let mut job = state
        .trending_jobs
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(JOB_NOT_FOUND))?;

    let changed = update.apply(&mut job)?;
    match state.trending_jobs.update(&job, &changed).await {
        Ok(()) => Ok(Json(job)),
        Err(FirestoreError::NotFound(_)) => Err(ApiError::not_found(JOB_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/trending-jobs/:id
pub async fn delete_trending_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    if !state.trending_jobs.delete(id).await? {
        return Err(ApiError::not_found(JOB_NOT_FOUND));
    }
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// POST /api/trending-jobs/:id/apply
pub async fn apply_trending_job(
    State(state): State<AppState>,
    Auth(seeker): Auth<JobSeekerAccount>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppliedResponse>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    let outcome = state.trending_jobs.apply(id, &seeker.id).await?;
    applied(TrendingJob::COLLECTION, outcome, JOB_NOT_FOUND)
}
