use axum::routing::get;
use axum::Router;

use crate::handlers::contracts;
use crate::state::AppState;

/// Contract routes mounted at `/contracts`.
///
/// ```text
/// GET    /                 -> list_contracts
/// POST   /                 -> create_contract
/// GET    /{contract_id}    -> get_contract
/// DELETE /{contract_id}    -> delete_contract
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(contracts::list_contracts).post(contracts::create_contract),
        )
        .route(
            "/{contract_id}",
            get(contracts::get_contract).delete(contracts::delete_contract),
        )
}
