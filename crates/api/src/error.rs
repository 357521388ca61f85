use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use expense_core::error::CoreError;
use expense_core::validation::FieldErrors;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `expense_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The request body used a content type no endpoint parses.
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        AppError::Core(CoreError::InvalidFields(errors))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::InvalidFields(errors) => {
                    fields = Some(errors.clone());
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Invalid input".to_string(),
                    )
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::UnsupportedMediaType(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = match fields {
            Some(fields) => json!({
                "error": message,
                "code": code,
                "fields": fields,
            }),
            None => json!({
                "error": message,
                "code": code,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Foreign key and check constraint violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => (
            StatusCode::CONFLICT,
            "CONFLICT",
            "Duplicate value violates a unique constraint".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "Referenced record does not exist".to_string(),
        ),
        sqlx::Error::Database(db_err) if db_err.is_check_violation() => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "Value violates a check constraint".to_string(),
        ),
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

/// Error type for the `/api/*` endpoints the bundled frontend talks to.
///
/// Renders the bodies that client expects: `{"error": "Expense not found"}`
/// for a missing row, the bare field-error map for invalid input and
/// `{"detail": ...}` for bodies that could not be parsed. Anything else is
/// rendered by [`AppError`].
#[derive(Debug)]
pub enum LegacyError {
    NotFound,
    Invalid(FieldErrors),
    App(AppError),
}

pub type LegacyResult<T> = Result<T, LegacyError>;

impl From<AppError> for LegacyError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Core(CoreError::InvalidFields(errors)) => LegacyError::Invalid(errors),
            AppError::Core(CoreError::NotFound { .. }) => LegacyError::NotFound,
            other => LegacyError::App(other),
        }
    }
}

impl From<FieldErrors> for LegacyError {
    fn from(errors: FieldErrors) -> Self {
        LegacyError::Invalid(errors)
    }
}

impl From<sqlx::Error> for LegacyError {
    fn from(err: sqlx::Error) -> Self {
        LegacyError::App(AppError::Database(err))
    }
}

impl IntoResponse for LegacyError {
    fn into_response(self) -> Response {
        match self {
            LegacyError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Expense not found"})),
            )
                .into_response(),
            LegacyError::Invalid(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            LegacyError::App(AppError::BadRequest(detail)) => {
                detail_response(StatusCode::BAD_REQUEST, detail)
            }
            LegacyError::App(AppError::PayloadTooLarge(detail)) => {
                detail_response(StatusCode::PAYLOAD_TOO_LARGE, detail)
            }
            LegacyError::App(AppError::UnsupportedMediaType(detail)) => {
                detail_response(StatusCode::UNSUPPORTED_MEDIA_TYPE, detail)
            }
            LegacyError::App(other) => other.into_response(),
        }
    }
}

fn detail_response(status: StatusCode, detail: String) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}
