use axum::routing::{get, post};
use axum::Router;

use crate::handlers::modifications;
use crate::state::AppState;

/// Contract modification routes mounted at `/modifications`.
///
/// Responses to a proposal live under `/companies` and `/students`.
///
/// ```text
/// POST   /                     -> propose_modification
/// GET    /{modification_id}    -> get_modification
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(modifications::propose_modification))
        .route("/{modification_id}", get(modifications::get_modification))
}
