//! Registration and login for both account kinds.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hirehub_firestore::FirestoreError;
use hirehub_models::{
    AccountKind, JobSeekerAccount, JobSeekerProfile, JobSeekerRegistration, LoginRequest,
    RecruiterAccount, RecruiterProfile, RecruiterRegistration,
};
use serde::Serialize;
use tracing::info;

use crate::auth::Principal;
use crate::error::{ApiError, ApiResult, JsonBody};
use crate::metrics;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Debug, Serialize)]
pub struct JobSeekerSession {
    pub token: String,
    pub user: JobSeekerProfile,
}

#[derive(Debug, Serialize)]
pub struct RecruiterSession {
    pub token: String,
    pub recruiter: RecruiterProfile,
}

fn duplicate_message(kind: AccountKind) -> &'static str {
    match kind {
        AccountKind::JobSeeker => "User already exists",
        AccountKind::Recruiter => "Recruiter already exists",
    }
}

/// Store a new account and issue its first token.
async fn open_account<A: Principal>(state: &AppState, account: A) -> ApiResult<(String, A::Profile)> {
    match A::repository(state).create(&account).await {
        Ok(()) => {}
        Err(FirestoreError::AlreadyExists(_)) => {
            info!(kind = %A::KIND, "Registration rejected: email already registered");
            return Err(ApiError::bad_request(duplicate_message(A::KIND)));
        }
        Err(e) => return Err(e.into()),
    }

    metrics::record_registration(A::KIND.as_str());
    let token = state.tokens.issue(account.id(), A::KIND)?;
    Ok((token, account.profile()))
}

/// Check credentials without revealing which half was wrong.
async fn authenticate<A: Principal>(state: &AppState, login: LoginRequest) -> ApiResult<(String, A::Profile)> {
    let (email, password) = login.credentials()?;

    let account = A::repository(state).find_by_email(&email).await?;
    let verified = match &account {
        Some(account) => {
            state
                .passwords
                .verify(password, account.password_hash().to_string())
                .await?
        }
        None => false,
    };

    let account = match account {
        Some(account) if verified => account,
        _ => {
            metrics::record_login(A::KIND.as_str(), false);
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
    };

    metrics::record_login(A::KIND.as_str(), true);
    info!(kind = %A::KIND, account_id = %account.id(), "Login succeeded");
    let token = state.tokens.issue(account.id(), A::KIND)?;
    Ok((token, account.profile()))
}

/// POST /api/auth/register
pub async fn register_job_seeker(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<JobSeekerRegistration>,
) -> ApiResult<(StatusCode, Json<JobSeekerSession>)> {
    let registration = body.validate()?;
    let hash = state.passwords.hash(registration.password.clone()).await?;
    let account = JobSeekerAccount::new(registration, hash, Utc::now());

    let (token, user) = open_account(&state, account).await?;
    Ok((StatusCode::CREATED, Json(JobSeekerSession { token, user })))
}

/// POST /api/auth/login
pub async fn login_job_seeker(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Json<JobSeekerSession>> {
    let (token, user) = authenticate::<JobSeekerAccount>(&state, body).await?;
    Ok(Json(JobSeekerSession { token, user }))
}

/// POST /api/recruiter/register
pub async fn register_recruiter(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RecruiterRegistration>,
) -> ApiResult<(StatusCode, Json<RecruiterSession>)> {
    let registration = body.validate()?;
    let hash = state.passwords.hash(registration.password.clone()).await?;
    let account = RecruiterAccount::new(registration, hash, Utc::now());

    let (token, recruiter) = open_account(&state, account).await?;
    Ok((StatusCode::CREATED, Json(RecruiterSession { token, recruiter })))
}

/// POST /api/recruiter/login
pub async fn login_recruiter(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> ApiResult<Json<RecruiterSession>> {
    let (token, recruiter) = authenticate::<RecruiterAccount>(&state, body).await?;
    Ok(Json(RecruiterSession { token, recruiter }))
}
