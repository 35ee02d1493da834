//! # Error Handling Middleware
//!
//! This module provides a standardized way to handle errors in the TutorSync
//! API. It maps domain-specific errors to appropriate HTTP status codes and
//! JSON error responses, ensuring a consistent error handling experience
//! across the entire API.
//!
//! The mapping follows the error taxonomy of the scheduling core: client
//! mistakes are 4xx (with 409 reserved for booking conflicts and 422 for
//! lifecycle rule violations), infrastructure failures are 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tutorsync_core::errors::ScheduleError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// `AppError` wraps domain-specific `ScheduleError` instances and implements
/// `IntoResponse` to convert them into HTTP responses with appropriate status
/// codes and JSON payloads.
///
/// # Example
///
/// ```
/// use axum::Json;
/// use tutorsync_api::middleware::error_handling::AppError;
/// use tutorsync_core::errors::ScheduleError;
/// use uuid::Uuid;
///
/// async fn handler(id: Uuid) -> Result<Json<String>, AppError> {
///     Err(AppError(ScheduleError::NotFound(format!(
///         "Booking with ID {} not found",
///         id
///     ))))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

/// Converts application errors to HTTP responses.
///
/// Each error variant maps to one status code; the response body is always
/// `{ "error": message }` with the error's display text.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            ScheduleError::InvalidInterval(_) | ScheduleError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            ScheduleError::Authorization(_) => StatusCode::FORBIDDEN,
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Conflict(_) => StatusCode::CONFLICT,
            ScheduleError::IllegalTransition { .. } | ScheduleError::CancellationWindow { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ScheduleError::Database(_) | ScheduleError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // Infrastructure failures are logged server-side; clients only see
        // the generic message.
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Request failed: {}", self.0);
        }

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

/// Automatic conversion from ScheduleError to AppError.
///
/// Allows using the `?` operator with functions that return
/// `Result<T, ScheduleError>` in handlers that return `Result<T, AppError>`.
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

/// Automatic conversion from eyre::Report to AppError.
///
/// Wraps the report in a `ScheduleError::Database` variant so stray
/// infrastructure errors surface as 500s.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ScheduleError::Database(err))
    }
}
