//! Handlers for company and student job requests.
//!
//! Matching transitions (candidates, counterpart acceptance, rejection,
//! owner acceptance) answer `{ "data": null }` when the rules refuse the
//! action. Plain lookups and deletes answer 404 for an unknown id.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use gigbridge_core::error::CoreError;
use gigbridge_core::matching::FilterTag;
use gigbridge_core::types::DbId;
use gigbridge_db::models::request::{
    CreateCompanyRequest, CreateStudentRequest, UpdateCompanyRequest, UpdateStudentRequest,
};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(entity: &'static str, id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}

// ---------------------------------------------------------------------------
// Company requests
// ---------------------------------------------------------------------------

/// POST /api/v1/company-requests
pub async fn create_company_request(
    State(state): State<AppState>,
    Json(input): Json<CreateCompanyRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.create_company_request(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/company-requests
pub async fn list_company_requests(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let requests = state.matching.list_company_requests().await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/company-requests/filter
///
/// Range filter on `hoursPerWeek`, `totalHours`, or `salary`. An unknown
/// field or an inverted/negative range yields an empty list.
pub async fn filter_company_requests(
    State(state): State<AppState>,
    Json(tag): Json<FilterTag>,
) -> AppResult<impl IntoResponse> {
    let requests = state.matching.filter_company_requests(&tag).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/company-requests/{service_id}
pub async fn get_company_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .matching
        .get_company_request(service_id)
        .await?
        .ok_or_else(|| not_found("CompanyRequest", service_id))?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/company-requests/{service_id}
///
/// Partial update; absent fields and `-1` leave a value unchanged.
pub async fn update_company_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
    Json(input): Json<UpdateCompanyRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.update_company_request(service_id, &input).await?;
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/company-requests/{service_id}
pub async fn delete_company_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = state
        .matching
        .delete_company_request(service_id)
        .await?
        .ok_or_else(|| not_found("CompanyRequest", service_id))?;
    Ok(Json(DataResponse { data: deleted }))
}

/// GET /api/v1/company-requests/{service_id}/candidates
pub async fn list_candidates(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let candidates = state
        .matching
        .list_candidates(service_id)
        .await?
        .ok_or_else(|| not_found("CompanyRequest", service_id))?;
    Ok(Json(DataResponse { data: candidates }))
}

/// POST /api/v1/company-requests/{service_id}/candidates/{student_id}
///
/// A student accepts a company request as counterpart.
pub async fn add_candidate(
    State(state): State<AppState>,
    Path((service_id, student_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.add_candidate(service_id, &student_id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/company-requests/{service_id}/candidates/{student_id}
pub async fn remove_candidate(
    State(state): State<AppState>,
    Path((service_id, student_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.remove_candidate(service_id, &student_id).await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/company-requests/{service_id}/accept-own/{company_id}/{student_id}
///
/// The owning company picks a candidate; the request becomes a contract.
pub async fn accept_own_company_request(
    State(state): State<AppState>,
    Path((service_id, company_id, student_id)): Path<(DbId, String, String)>,
) -> AppResult<impl IntoResponse> {
    let accepted = state
        .matching
        .accept_own_company_request(&company_id, service_id, &student_id)
        .await?;
    Ok(Json(DataResponse { data: accepted }))
}

// ---------------------------------------------------------------------------
// Student requests
// ---------------------------------------------------------------------------

/// Query parameters for `GET /student-requests`.
#[derive(Debug, Deserialize)]
pub struct StudentRequestQuery {
    /// Only requests whose expertise contains this tag.
    pub expertise: Option<String>,
}

/// POST /api/v1/student-requests
pub async fn create_student_request(
    State(state): State<AppState>,
    Json(input): Json<CreateStudentRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.create_student_request(&input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/student-requests?expertise=
pub async fn list_student_requests(
    State(state): State<AppState>,
    Query(query): Query<StudentRequestQuery>,
) -> AppResult<impl IntoResponse> {
    let requests = match query.expertise.as_deref() {
        Some(tag) => state.matching.search_expertise(tag).await?,
        None => state.matching.list_student_requests().await?,
    };
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/student-requests/filter
pub async fn filter_student_requests(
    State(state): State<AppState>,
    Json(tag): Json<FilterTag>,
) -> AppResult<impl IntoResponse> {
    let requests = state.matching.filter_student_requests(&tag).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/student-requests/{service_id}
pub async fn get_student_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .matching
        .get_student_request(service_id)
        .await?
        .ok_or_else(|| not_found("StudentRequest", service_id))?;
    Ok(Json(DataResponse { data: request }))
}

/// PUT /api/v1/student-requests/{service_id}
pub async fn update_student_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
    Json(input): Json<UpdateStudentRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.update_student_request(service_id, &input).await?;
    Ok(Json(DataResponse { data: request }))
}

/// DELETE /api/v1/student-requests/{service_id}
pub async fn delete_student_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = state
        .matching
        .delete_student_request(service_id)
        .await?
        .ok_or_else(|| not_found("StudentRequest", service_id))?;
    Ok(Json(DataResponse { data: deleted }))
}

/// POST /api/v1/student-requests/{service_id}/accept/{company_id}
///
/// A company accepts a student request as counterpart.
pub async fn accept_student_request(
    State(state): State<AppState>,
    Path((service_id, company_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .matching
        .accept_student_request(service_id, &company_id)
        .await?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/student-requests/{service_id}/accept-own/{student_id}
pub async fn accept_own_student_request(
    State(state): State<AppState>,
    Path((service_id, student_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let accepted = state
        .matching
        .accept_own_student_request(&student_id, service_id)
        .await?;
    Ok(Json(DataResponse { data: accepted }))
}

// ---------------------------------------------------------------------------
// Either kind
// ---------------------------------------------------------------------------

/// GET /api/v1/requests/{service_id}
pub async fn get_request(
    State(state): State<AppState>,
    Path(service_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .matching
        .get_request(service_id)
        .await?
        .ok_or_else(|| not_found("Request", service_id))?;
    Ok(Json(DataResponse { data: request }))
}

/// POST /api/v1/requests/{service_id}/reject/{party_id}
///
/// Undo a counterpart's interest, returning the request to open.
pub async fn reject_request(
    State(state): State<AppState>,
    Path((service_id, party_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let request = state.matching.reject(service_id, &party_id).await?;
    Ok(Json(DataResponse { data: request }))
}

// ---------------------------------------------------------------------------
// Party-scoped views
// ---------------------------------------------------------------------------

/// GET /api/v1/companies/{company_id}/requests
pub async fn list_company_requests_for_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let requests = state.matching.list_for_company(&company_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// DELETE /api/v1/companies/{company_id}/requests
pub async fn delete_company_requests_for_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = state.matching.delete_all_for_company(&company_id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// GET /api/v1/students/{student_id}/requests
pub async fn list_student_requests_for_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let requests = state.matching.list_for_student(&student_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// GET /api/v1/students/{student_id}/targeted-requests
pub async fn list_targeted_requests(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let requests = state.matching.list_targeting(&student_id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/students/{student_id}/targeted-requests
///
/// Create a company request only `student_id` can become a candidate for.
pub async fn create_targeted_request(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(input): Json<CreateCompanyRequest>,
) -> AppResult<impl IntoResponse> {
    let request = state
        .matching
        .create_targeted_request(&student_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}
