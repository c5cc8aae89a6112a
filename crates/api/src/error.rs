//! JSON error responses.
//!
//! Every error leaves the API as `{ "error": <code>, "message": <text> }`.
//! Database and internal failures are logged and replaced with a generic
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use yaracheck_shared::AppError;

/// Builds an error response.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

/// Generic 500 response. Callers log the cause first.
pub fn internal_error() -> Response {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An error occurred",
    )
}

/// Maps an [`AppError`] to its response.
pub fn app_error_response(e: AppError) -> Response {
    match e {
        AppError::Database(_) | AppError::Internal(_) => {
            error!(error = %e, "Request failed");
            internal_error()
        }
        AppError::ExternalService(_) => {
            error!(error = %e, "External service failed");
            error_response(
                StatusCode::BAD_GATEWAY,
                "external_service_error",
                e.public_message(),
            )
        }
        _ => {
            let status = StatusCode::from_u16(e.status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            error_response(
                status,
                &e.error_code().to_ascii_lowercase(),
                e.public_message(),
            )
        }
    }
}

/// Logs a database error and returns the generic 500 response.
pub fn db_error(context: &str, e: &sea_orm::DbErr) -> Response {
    error!(error = %e, "{context}");
    internal_error()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_app_error() {
        let response = app_error_response(AppError::InvalidTransition("x".to_string()));
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = app_error_response(AppError::Forbidden("no".to_string()));
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_database_errors_are_masked() {
        let response = app_error_response(AppError::Database("relation missing".to_string()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
