//! Recruiter profile handlers.

use axum::extract::State;
use axum::Json;
use hirehub_models::{RecruiterAccount, RecruiterDetails, RecruiterProfileUpdate};
use serde::Serialize;
use tracing::info;

use crate::auth::Auth;
use crate::error::{ApiResult, JsonBody};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileUpdated {
    pub message: &'static str,
    pub recruiter: RecruiterDetails,
}

/// GET /api/recruiter/profile
pub async fn get_profile(Auth(recruiter): Auth<RecruiterAccount>) -> Json<RecruiterDetails> {
    Json(recruiter.details())
}

/// PUT /api/recruiter/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Auth(mut recruiter): Auth<RecruiterAccount>,
    JsonBody(update): JsonBody<RecruiterProfileUpdate>,
) -> ApiResult<Json<ProfileUpdated>> {
    let changed = recruiter.apply_update(update);
    state.recruiters.update(&recruiter, &changed).await?;

    info!(recruiter_id = %recruiter.id, fields = ?changed, "Recruiter profile updated");
    Ok(Json(ProfileUpdated {
        message: "Profile updated successfully",
        recruiter: recruiter.details(),
    }))
}
