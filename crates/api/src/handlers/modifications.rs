//! Handlers for the contract modification protocol.
//!
//! Responses are scoped by party in the URL: a company answers under
//! `/companies/{company_id}/modifications/...`, a student under
//! `/students/{student_id}/modifications/...`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use gigbridge_core::error::CoreError;
use gigbridge_core::modification::Response;
use gigbridge_core::party::Party;
use gigbridge_core::types::DbId;
use gigbridge_db::models::modification::ProposeModification;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/modifications
///
/// `{ "data": null }` when the contract is unknown or terminated, terms are
/// incomplete, or the duration is illegal. An unknown `modificationType`
/// is a 400.
pub async fn propose_modification(
    State(state): State<AppState>,
    Json(input): Json<ProposeModification>,
) -> AppResult<impl IntoResponse> {
    let modification = state.modifications.propose(&input).await?;
    Ok(Json(DataResponse { data: modification }))
}

/// GET /api/v1/modifications/{modification_id}
pub async fn get_modification(
    State(state): State<AppState>,
    Path(modification_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let modification = state
        .modifications
        .get(modification_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ContractModification",
            id: modification_id,
        }))?;
    Ok(Json(DataResponse { data: modification }))
}

async fn respond(
    state: &AppState,
    by: Party,
    party_id: &str,
    modification_id: DbId,
    response: Response,
) -> AppResult<impl IntoResponse> {
    let resolution = state
        .modifications
        .respond(modification_id, by, party_id, response)
        .await?;
    Ok(Json(DataResponse { data: resolution }))
}

/// POST /api/v1/companies/{company_id}/modifications/{modification_id}/accept
pub async fn company_accepts(
    State(state): State<AppState>,
    Path((company_id, modification_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    respond(&state, Party::Company, &company_id, modification_id, Response::Accept).await
}

/// POST /api/v1/companies/{company_id}/modifications/{modification_id}/decline
pub async fn company_declines(
    State(state): State<AppState>,
    Path((company_id, modification_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    respond(&state, Party::Company, &company_id, modification_id, Response::Decline).await
}

/// POST /api/v1/students/{student_id}/modifications/{modification_id}/accept
pub async fn student_accepts(
    State(state): State<AppState>,
    Path((student_id, modification_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    respond(&state, Party::Student, &student_id, modification_id, Response::Accept).await
}

/// POST /api/v1/students/{student_id}/modifications/{modification_id}/decline
pub async fn student_declines(
    State(state): State<AppState>,
    Path((student_id, modification_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    respond(&state, Party::Student, &student_id, modification_id, Response::Decline).await
}

/// GET /api/v1/companies/{company_id}/modifications
///
/// Open proposals the company still has to answer.
pub async fn company_awaiting(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let pending = state.modifications.awaiting(Party::Company, &company_id).await?;
    Ok(Json(DataResponse { data: pending }))
}

/// GET /api/v1/students/{student_id}/modifications
pub async fn student_awaiting(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let pending = state.modifications.awaiting(Party::Student, &student_id).await?;
    Ok(Json(DataResponse { data: pending }))
}

/// GET /api/v1/companies/{company_id}/modifications/all
pub async fn company_history(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let history = state.modifications.involving(Party::Company, &company_id).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/students/{student_id}/modifications/all
pub async fn student_history(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let history = state.modifications.involving(Party::Student, &student_id).await?;
    Ok(Json(DataResponse { data: history }))
}
