//! Handlers for the contract registry.
//!
//! `POST /contracts` is also the endpoint a remote
//! [`HttpContractPeer`](crate::peer::HttpContractPeer) posts drafts to.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use gigbridge_core::error::CoreError;
use gigbridge_core::types::DbId;
use gigbridge_db::models::contract::CreateContract;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/contracts
///
/// `{ "data": null }` when the terms are not positive or the duration is
/// illegal.
pub async fn create_contract(
    State(state): State<AppState>,
    Json(draft): Json<CreateContract>,
) -> AppResult<impl IntoResponse> {
    let contract = state.contracts.create(&draft).await?;
    Ok(Json(DataResponse { data: contract }))
}

/// GET /api/v1/contracts
pub async fn list_contracts(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let contracts = state.contracts.list().await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/contracts/{contract_id}
pub async fn get_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let contract = state
        .contracts
        .get(contract_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id: contract_id,
        }))?;
    Ok(Json(DataResponse { data: contract }))
}

/// DELETE /api/v1/contracts/{contract_id}
pub async fn delete_contract(
    State(state): State<AppState>,
    Path(contract_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    if !state.contracts.delete(contract_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Contract",
            id: contract_id,
        }));
    }
    Ok(Json(DataResponse { data: contract_id }))
}

/// GET /api/v1/companies/{company_id}/contracts
pub async fn list_company_contracts(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let contracts = state.contracts.list_for_company(&company_id).await?;
    Ok(Json(DataResponse { data: contracts }))
}

/// GET /api/v1/students/{student_id}/contracts
pub async fn list_student_contracts(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let contracts = state.contracts.list_for_student(&student_id).await?;
    Ok(Json(DataResponse { data: contracts }))
}
