//! Domain errors shared by the storage and HTTP layers.
//!
//! Protocol refusals (illegal duration, wrong responder, dangling contract)
//! are not errors; they surface as absent results.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Malformed input: unknown enum strings, non-positive terms.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A versioned write kept losing its race.
    #[error("Conflict: {0}")]
    Conflict(String),
}
