pub mod contracts;
pub mod health;
pub mod modifications;
pub mod parties;
pub mod requests;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /company-requests                                   list, create
/// /company-requests/filter                            range filter (POST)
/// /company-requests/{service_id}                      get, update, delete
/// /company-requests/{service_id}/candidates           list candidates
/// /company-requests/{service_id}/candidates/{sid}     add (POST), remove (DELETE)
/// /company-requests/{service_id}/accept-own/{cid}/{sid}
///                                                     company picks a candidate
/// /company-requests/{service_id}/amendments           propose amendment (POST)
///
/// /student-requests                                   list (?expertise=), create
/// /student-requests/filter                            range filter (POST)
/// /student-requests/{service_id}                      get, update, delete
/// /student-requests/{service_id}/accept/{cid}         company accepts (POST)
/// /student-requests/{service_id}/accept-own/{sid}     student confirms (POST)
///
/// /requests/{service_id}                              get either kind
/// /requests/{service_id}/reject/{party_id}            counterpart withdraws (POST)
///
/// /companies/{company_id}/requests                    list, delete all
/// /companies/{company_id}/amendments                  pending amendments
/// /companies/{company_id}/amendments/{id}/accept      accept (POST)
/// /companies/{company_id}/amendments/{id}/reject      reject (POST)
/// /companies/{company_id}/modifications               awaiting this company
/// /companies/{company_id}/modifications/all           full history
/// /companies/{company_id}/modifications/{id}/accept   accept (POST)
/// /companies/{company_id}/modifications/{id}/decline  decline (POST)
/// /companies/{company_id}/contracts                   contracts of the company
///
/// /students/{student_id}/requests                     own student requests
/// /students/{student_id}/targeted-requests            list, create targeted
/// /students/{student_id}/modifications                awaiting this student
/// /students/{student_id}/modifications/all            full history
/// /students/{student_id}/modifications/{id}/accept    accept (POST)
/// /students/{student_id}/modifications/{id}/decline   decline (POST)
/// /students/{student_id}/contracts                    contracts of the student
///
/// /modifications                                      propose (POST)
/// /modifications/{modification_id}                    get
///
/// /contracts                                          list, create
/// /contracts/{contract_id}                            get, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/company-requests", requests::company_router())
        .nest("/student-requests", requests::student_router())
        .nest("/requests", requests::any_router())
        // Views and actions scoped to one side of an agreement.
        .nest("/companies", parties::companies_router())
        .nest("/students", parties::students_router())
        .nest("/modifications", modifications::router())
        .nest("/contracts", contracts::router())
}
