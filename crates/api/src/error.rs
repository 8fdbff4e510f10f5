use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gigbridge_core::error::CoreError;
use gigbridge_db::StoreError;
use serde_json::json;

use crate::peer::PeerError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds storage and contract
/// peer failures. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The contract service could not be reached or refused the call.
    #[error(transparent)]
    Peer(#[from] PeerError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            },

            AppError::Store(StoreError::Database(err))
            | AppError::Peer(PeerError::Store(StoreError::Database(err))) => {
                classify_sqlx_error(err)
            }
            AppError::Store(err) | AppError::Peer(PeerError::Store(err)) => {
                tracing::error!(error = %err, "Storage error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }

            AppError::Peer(err) => {
                tracing::warn!(error = %err, "Contract service call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The contract service is unavailable".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Check constraint violations (`23514`) map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23514") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                return (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    format!("Value violates check constraint: {constraint}"),
                );
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let cases = [
            (CoreError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (
                CoreError::NotFound {
                    entity: "Contract",
                    id: 4,
                },
                StatusCode::NOT_FOUND,
            ),
            (CoreError::Conflict("race".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::Core(err).into_response().status(), status);
        }
    }

    #[test]
    fn peer_errors_are_bad_gateway() {
        let response = AppError::Peer(PeerError::HttpStatus(503)).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
