//! Route definitions for job requests.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{amendments, requests};
use crate::state::AppState;

/// Company request routes mounted at `/company-requests`.
///
/// ```text
/// GET    /                                                -> list_company_requests
/// POST   /                                                -> create_company_request
/// POST   /filter                                          -> filter_company_requests
/// GET    /{service_id}                                    -> get_company_request
/// PUT    /{service_id}                                    -> update_company_request
/// DELETE /{service_id}                                    -> delete_company_request
/// GET    /{service_id}/candidates                         -> list_candidates
/// POST   /{service_id}/candidates/{student_id}            -> add_candidate
/// DELETE /{service_id}/candidates/{student_id}            -> remove_candidate
/// POST   /{service_id}/accept-own/{company_id}/{student_id} -> accept_own_company_request
/// POST   /{service_id}/amendments                         -> propose_amendment
/// ```
pub fn company_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requests::list_company_requests).post(requests::create_company_request),
        )
        .route("/filter", post(requests::filter_company_requests))
        .route(
            "/{service_id}",
            get(requests::get_company_request)
                .put(requests::update_company_request)
                .delete(requests::delete_company_request),
        )
        .route("/{service_id}/candidates", get(requests::list_candidates))
        .route(
            "/{service_id}/candidates/{student_id}",
            post(requests::add_candidate).delete(requests::remove_candidate),
        )
        .route(
            "/{service_id}/accept-own/{company_id}/{student_id}",
            post(requests::accept_own_company_request),
        )
        .route(
            "/{service_id}/amendments",
            post(amendments::propose_amendment),
        )
}

/// Student request routes mounted at `/student-requests`.
///
/// ```text
/// GET    /                                  -> list_student_requests (?expertise=)
/// POST   /                                  -> create_student_request
/// POST   /filter                            -> filter_student_requests
/// GET    /{service_id}                      -> get_student_request
/// PUT    /{service_id}                      -> update_student_request
/// DELETE /{service_id}                      -> delete_student_request
/// POST   /{service_id}/accept/{company_id}  -> accept_student_request
/// POST   /{service_id}/accept-own/{student_id} -> accept_own_student_request
/// ```
pub fn student_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(requests::list_student_requests).post(requests::create_student_request),
        )
        .route("/filter", post(requests::filter_student_requests))
        .route(
            "/{service_id}",
            get(requests::get_student_request)
                .put(requests::update_student_request)
                .delete(requests::delete_student_request),
        )
        .route(
            "/{service_id}/accept/{company_id}",
            post(requests::accept_student_request),
        )
        .route(
            "/{service_id}/accept-own/{student_id}",
            post(requests::accept_own_student_request),
        )
}

/// Routes that take a service id of either kind, mounted at `/requests`.
///
/// ```text
/// GET    /{service_id}                    -> get_request
/// POST   /{service_id}/reject/{party_id}  -> reject_request
/// ```
pub fn any_router() -> Router<AppState> {
    Router::new()
        .route("/{service_id}", get(requests::get_request))
        .route(
            "/{service_id}/reject/{party_id}",
            post(requests::reject_request),
        )
}
