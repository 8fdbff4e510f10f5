//! Handlers for amendments to open company requests.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use gigbridge_core::types::DbId;
use gigbridge_db::models::amendment::ProposeAmendment;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/company-requests/{service_id}/amendments
pub async fn propose_amendment(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
    Json(input): Json<ProposeAmendment>,
) -> AppResult<impl IntoResponse> {
    let amendment = state.amendments.propose(service_id, &input).await?;
    Ok(Json(DataResponse { data: amendment }))
}

/// GET /api/v1/companies/{company_id}/amendments
pub async fn list_amendments(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let amendments = state.amendments.list_for_company(&company_id).await?;
    Ok(Json(DataResponse { data: amendments }))
}

/// POST /api/v1/companies/{company_id}/amendments/{modification_id}/accept
///
/// Returns the updated company request.
pub async fn accept_amendment(
    State(state): State<AppState>,
    Path((company_id, modification_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let request = state.amendments.accept(&company_id, modification_id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/companies/{company_id}/amendments/{modification_id}/reject
///
/// Returns the unchanged company request.
pub async fn reject_amendment(
    State(state): State<AppState>,
    Path((company_id, modification_id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let request = state.amendments.reject(&company_id, modification_id).await?;
    Ok(Json(DataResponse { data: request }))
}
