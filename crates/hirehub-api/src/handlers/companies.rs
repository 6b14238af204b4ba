//! Company directory handlers.
//!
//! Companies have no owner, so every operation is public.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hirehub_firestore::FirestoreError;
use hirehub_models::{Company, CompanyUpdate, NewCompany};
use tracing::info;

use crate::error::{ApiError, ApiResult, JsonBody};
use crate::handlers::MessageResponse;
use crate::security::record_id;
use crate::state::AppState;

const COMPANY_NOT_FOUND: &str = "Company not found";

/// GET /api/companies
pub async fn list_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<Company>>> {
    Ok(Json(state.companies.list().await?))
}

/// POST /api/companies
pub async fn create_company(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewCompany>,
) -> ApiResult<(StatusCode, Json<Company>)> {
    let company = body.into_company(Utc::now())?;
    state.companies.create(&company).await?;
    info!(company_id = %company.id, name = %company.name, "Company created");
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /api/companies/:id
pub async fn get_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Company>> {
    let id = record_id(&id, COMPANY_NOT_FOUND)?;
    state
        .companies
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(COMPANY_NOT_FOUND))
}

/// PUT /api/companies/:id
pub async fn update_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<CompanyUpdate>,
) -> ApiResult<Json<Company>> {
    let id = record_id(&id, COMPANY_NOT_FOUND)?;
    let mut company = state
        .companies
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(COMPANY_NOT_FOUND))?;

    let changed = update.apply(&mut company)?;
    match state.companies.update(&company, &changed).await {
        Ok(()) => Ok(Json(company)),
        Err(FirestoreError::NotFound(_)) => Err(ApiError::not_found(COMPANY_NOT_FOUND)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/companies/:id
pub async fn delete_company(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = record_id(&id, COMPANY_NOT_FOUND)?;
    if !state.companies.delete(id).await? {
        return Err(ApiError::not_found(COMPANY_NOT_FOUND));
    }
    info!(company_id = %id, "Company deleted");
    Ok(Json(MessageResponse::new("Company deleted successfully")))
}
