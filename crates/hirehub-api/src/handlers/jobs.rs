//! Job posting handlers.
//!
//! Search and detail are public. Creation, update and delete need a recruiter
//! token; applying needs a job-seeker token.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hirehub_firestore::client::MAX_COMMIT_WRITES;
use hirehub_firestore::{ApplyOutcome, FirestoreError, Record};
use hirehub_models::{
    JobPosting, JobSearchQuery, JobSeekerAccount, JobUpdate, ModelError, NewJob, RecruiterAccount,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::Auth;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::handlers::{from_json, AppliedResponse, MessageResponse};
use crate::metrics;
use crate::security::record_id;
use crate::state::AppState;

const JOB_NOT_FOUND: &str = "Job not found";

/// Created posting(s), mirroring the shape of the request body.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CreatedJobs {
    One(Box<JobPosting>),
    Many(Vec<JobPosting>),
}

/// GET /api/jobs
pub async fn search_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobSearchQuery>,
) -> ApiResult<Json<Vec<JobPosting>>> {
    let filter = query.into_filter();
    let jobs = state.jobs.search(&filter).await?;
    debug!(results = jobs.len(), "Job search");
    Ok(Json(jobs))
}

/// POST /api/jobs
///
/// Accepts one job object or an array of them. Every posting is stamped with
/// the caller as owner; array bodies are inserted all-or-nothing.
pub async fn create_jobs(
    State(state): State<AppState>,
    Auth(recruiter): Auth<RecruiterAccount>,
    JsonBody(body): JsonBody<Value>,
) -> ApiResult<(StatusCode, Json<CreatedJobs>)> {
    let now = Utc::now();

    match body {
        Value::Array(items) => {
            if items.len() > MAX_COMMIT_WRITES {
                return Err(ApiError::bad_request(format!(
                    "Cannot create more than {} jobs at once",
                    MAX_COMMIT_WRITES
                )));
            }
            let postings = items
                .into_iter()
                .map(|item| {
                    from_json::<NewJob>(item)?
                        .into_posting(recruiter.id.clone(), now)
                        .map_err(ApiError::from)
                })
                .collect::<ApiResult<Vec<_>>>()?;

            state.jobs.create_many(&postings).await?;
            metrics::record_jobs_created(JobPosting::COLLECTION, postings.len());
            info!(recruiter_id = %recruiter.id, count = postings.len(), "Jobs created");
            Ok((StatusCode::CREATED, Json(CreatedJobs::Many(postings))))
        }
        single => {
            let posting = from_json::<NewJob>(single)?.into_posting(recruiter.id.clone(), now)?;

            state.jobs.create(&posting).await?;
            metrics::record_jobs_created(JobPosting::COLLECTION, 1);
            info!(recruiter_id = %recruiter.id, job_id = %posting.id, "Job created");
            Ok((StatusCode::CREATED, Json(CreatedJobs::One(Box::new(posting)))))
        }
    }
}

/// GET /api/jobs/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<JobPosting>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    state
        .jobs
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(JOB_NOT_FOUND))
}

fn ensure_owner(state: &AppState, job: &JobPosting, recruiter: &RecruiterAccount) -> ApiResult<()> {
    if state.config.enforce_job_ownership && job.recruiter_id != recruiter.id {
        warn!(
            job_id = %job.id,
            owner = %job.recruiter_id,
            caller = %recruiter.id,
            "Recruiter attempted to modify another recruiter's job"
        );
        return Err(ApiError::forbidden("Not authorized to modify this job"));
    }
    Ok(())
}

/// PUT /api/jobs/:id
pub async fn update_job(
    State(state): State<AppState>,
    Auth(recruiter): Auth<RecruiterAccount>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<JobUpdate>,
) -> ApiResult<Json<JobPosting>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    let mut job = state
        .jobs
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(JOB_NOT_FOUND))?;
    ensure_owner(&state, &job, &recruiter)?;

    let changed = update.apply(&mut job)?;
    match state.jobs.update(&job, &changed).await {
        Ok(()) => Ok(Json(job)),
        Err(FirestoreError::NotFound(_)) => Err(ApiError::not_found(JOB_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/jobs/:id
pub async fn delete_job(
    State(state): State<AppState>,
    Auth(recruiter): Auth<RecruiterAccount>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    if state.config.enforce_job_ownership {
        let job = state
            .jobs
            .get(id)
            .await?
            .ok_or_else(|| ApiError::not_found(JOB_NOT_FOUND))?;
        ensure_owner(&state, &job, &recruiter)?;
    }

    if !state.jobs.delete(id).await? {
        return Err(ApiError::not_found(JOB_NOT_FOUND));
    }
    info!(recruiter_id = %recruiter.id, job_id = %id, "Job deleted");
    Ok(Json(MessageResponse::new("Job deleted successfully")))
}

/// GET /api/jobs/recruiter/jobs
pub async fn recruiter_jobs(
    State(state): State<AppState>,
    Auth(recruiter): Auth<RecruiterAccount>,
) -> ApiResult<Json<Vec<JobPosting>>> {
    Ok(Json(state.jobs.list_by_recruiter(&recruiter.id).await?))
}

/// POST /api/jobs/:id/apply
pub async fn apply_job(
    State(state): State<AppState>,
    Auth(seeker): Auth<JobSeekerAccount>,
    Path(id): Path<String>,
) -> ApiResult<Json<AppliedResponse>> {
    let id = record_id(&id, JOB_NOT_FOUND)?;
    let outcome = state.jobs.apply(id, &seeker.id).await?;
    applied(JobPosting::COLLECTION, outcome, JOB_NOT_FOUND)
}

/// Map an apply outcome to the HTTP response.
pub(crate) fn applied(
    collection: &str,
    outcome: ApplyOutcome,
    not_found: &str,
) -> ApiResult<Json<AppliedResponse>> {
    match outcome {
        ApplyOutcome::Applied => {
            metrics::record_application(collection, "applied");
            Ok(Json(AppliedResponse::new()))
        }
        ApplyOutcome::AlreadyApplied => {
            metrics::record_application(collection, "duplicate");
            Err(ModelError::AlreadyApplied.into())
        }
        ApplyOutcome::NotFound => Err(ApiError::not_found(not_found)),
    }
}
