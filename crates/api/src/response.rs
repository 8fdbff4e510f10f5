//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Operations whose
//! business rules refused the action return `{ "data": null }` with 200.

use serde::{Deserialize, Serialize};

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}
