use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The variants are deliberately coarse enough for callers to pick a
/// recovery strategy: `ConflictNotResolved` is safe to retry,
/// `InvalidTransition` is not permitted, `ReconciliationAborted` needs an
/// operator.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Conflict not resolved: {0}")]
    ConflictNotResolved(String),

    #[error("Reconciliation aborted: {0}")]
    ReconciliationAborted(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidTransition { from, to } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "INVALID_TRANSITION",
                format!("Cannot move match from '{from}' to '{to}'"),
            ),
            AppError::ConflictNotResolved(msg) => (
                StatusCode::CONFLICT,
                "CONFLICT_NOT_RESOLVED",
                format!("{msg} (safe to retry)"),
            ),
            AppError::ReconciliationAborted(msg) => {
                tracing::error!("Reconciliation aborted: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RECONCILIATION_ABORTED",
                    "Reconciliation failed and was rolled back".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
