use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use dubsite_core::error::CoreError;
use dubsite_core::upload::PayloadError;
use dubsite_storage::StorageError;
use serde_json::json;

use crate::invocation::InvocationResponse;

/// Application-level error type for function handlers.
///
/// Every variant is terminal for the invocation and is reported as
/// `{"error": <message>, "code": <code>}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `dubsite_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The uploaded payload could not be decoded.
    #[error("Upload failed: {0}")]
    Payload(#[from] PayloadError),

    /// The storage service could not be reached or refused the file.
    #[error("Upload failed: {0}")]
    Storage(#[from] StorageError),

    /// A bad request with a human-readable message.
    #[error("{0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status, machine-readable code and client-facing message.
    ///
    /// Upstream failures keep the underlying error text so callers can
    /// diagnose them.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::MethodNotAllowed(_) => (
                    StatusCode::METHOD_NOT_ALLOWED,
                    "METHOD_NOT_ALLOWED",
                    "Method not allowed".to_string(),
                ),
                CoreError::Internal(msg) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    msg.clone(),
                ),
            },

            // --- Upstream failures ---
            AppError::Database(_) | AppError::Payload(_) | AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "UPSTREAM_FAILURE",
                self.to_string(),
            ),

            // --- Request errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }

    /// Render as the function response, logging server-side failures.
    pub fn into_invocation_response(self) -> InvocationResponse {
        let (status, code, message) = self.classify();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "Invocation failed");
        } else {
            tracing::debug!(error = %self, code, status = status.as_u16(), "Invocation rejected");
        }

        InvocationResponse::json(status, &json!({ "error": message, "code": code }))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.into_invocation_response().into_response()
    }
}
