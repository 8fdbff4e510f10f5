//! Routes scoped to one company or one student.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{amendments, contracts, modifications, requests};
use crate::state::AppState;

/// Company-scoped routes mounted at `/companies`.
///
/// ```text
/// GET    /{company_id}/requests                       -> list_company_requests_for_company
/// DELETE /{company_id}/requests                       -> delete_company_requests_for_company
/// GET    /{company_id}/amendments                     -> list_amendments
/// POST   /{company_id}/amendments/{id}/accept         -> accept_amendment
/// POST   /{company_id}/amendments/{id}/reject         -> reject_amendment
/// GET    /{company_id}/modifications                  -> company_awaiting
/// GET    /{company_id}/modifications/all              -> company_history
/// POST   /{company_id}/modifications/{id}/accept      -> company_accepts
/// POST   /{company_id}/modifications/{id}/decline     -> company_declines
/// GET    /{company_id}/contracts                      -> list_company_contracts
/// ```
pub fn companies_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{company_id}/requests",
            get(requests::list_company_requests_for_company)
                .delete(requests::delete_company_requests_for_company),
        )
        .route("/{company_id}/amendments", get(amendments::list_amendments))
        .route(
            "/{company_id}/amendments/{modification_id}/accept",
            post(amendments::accept_amendment),
        )
        .route(
            "/{company_id}/amendments/{modification_id}/reject",
            post(amendments::reject_amendment),
        )
        .route(
            "/{company_id}/modifications",
            get(modifications::company_awaiting),
        )
        .route(
            "/{company_id}/modifications/all",
            get(modifications::company_history),
        )
        .route(
            "/{company_id}/modifications/{modification_id}/accept",
            post(modifications::company_accepts),
        )
        .route(
            "/{company_id}/modifications/{modification_id}/decline",
            post(modifications::company_declines),
        )
        .route(
            "/{company_id}/contracts",
            get(contracts::list_company_contracts),
        )
}

/// Student-scoped routes mounted at `/students`.
///
/// ```text
/// GET    /{student_id}/requests                       -> list_student_requests_for_student
/// GET    /{student_id}/targeted-requests              -> list_targeted_requests
/// POST   /{student_id}/targeted-requests              -> create_targeted_request
/// GET    /{student_id}/modifications                  -> student_awaiting
/// GET    /{student_id}/modifications/all              -> student_history
/// POST   /{student_id}/modifications/{id}/accept      -> student_accepts
/// POST   /{student_id}/modifications/{id}/decline     -> student_declines
/// GET    /{student_id}/contracts                      -> list_student_contracts
/// ```
pub fn students_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{student_id}/requests",
            get(requests::list_student_requests_for_student),
        )
        .route(
            "/{student_id}/targeted-requests",
            get(requests::list_targeted_requests).post(requests::create_targeted_request),
        )
        .route(
            "/{student_id}/modifications",
            get(modifications::student_awaiting),
        )
        .route(
            "/{student_id}/modifications/all",
            get(modifications::student_history),
        )
        .route(
            "/{student_id}/modifications/{modification_id}/accept",
            post(modifications::student_accepts),
        )
        .route(
            "/{student_id}/modifications/{modification_id}/decline",
            post(modifications::student_declines),
        )
        .route(
            "/{student_id}/contracts",
            get(contracts::list_student_contracts),
        )
}
