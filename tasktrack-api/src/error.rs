/// Error handling for the API server
///
/// One unified error type mapping to HTTP responses. Handlers return
/// `Result<T, ApiError>`; each operation catches its own store failures and
/// maps them to exactly one response — there is no cross-cutting error
/// middleware.
///
/// # Body shapes
///
/// - Client errors (400/401/403/404/409): `{"message": "..."}`
/// - Validation failures (400): `{"errors": [{"field": "...", "message": "..."}]}`
/// - Server errors (500): `{"message": "Server error", "error": "<text>"}`
///
/// The raw error text in 500 bodies follows the source design; production
/// deployments may prefer to suppress it (one match arm below).

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use tasktrack_shared::auth::{jwt::JwtError, password::PasswordError};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) — malformed input or rejected self-delete
    BadRequest(String),

    /// Unauthorized (401) — missing/invalid token or bad credentials
    Unauthorized(String),

    /// Forbidden (403) — authenticated but insufficient privilege/ownership
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) — duplicate email at registration
    Conflict(String),

    /// Validation failure (400) — field-level, client must fix and resubmit
    Validation(Vec<FieldError>),

    /// Internal server error (500) — store failure or unexpected condition
    Internal(String),
}

/// One field-level validation failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    /// Field that failed validation
    pub field: String,

    /// What was wrong with it
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Unauthorized(msg) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Conflict(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "message": msg }))).into_response()
            }
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "errors": errors }))).into_response()
            }
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error", "error": msg })),
                )
                    .into_response()
            }
        }
    }
}

/// Convert store errors to API errors
///
/// RowNotFound maps to 404; a unique violation on the email index maps to the
/// duplicate-registration conflict; everything else is internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already in use".to_string());
                    }
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert body deserialization failures to API errors
///
/// Handlers take JSON bodies through `WithRejection`, so a body the
/// deserializer rejects (including an out-of-enum `status` value) answers in
/// the same shapes as every other client error instead of axum's plain-text
/// 422. Data errors carry a field path prefix (axum deserializes through
/// `serde_path_to_error`), which maps onto the field-level list; anything
/// without one (syntax errors, missing content type) becomes a plain 400.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let text = rejection.body_text();
        let text = text
            .strip_prefix("Failed to deserialize the JSON body into the target type: ")
            .map(str::to_string)
            .unwrap_or(text);

        match text.split_once(": ") {
            Some((field, message)) if !field.is_empty() && !field.contains(' ') => {
                ApiError::Validation(vec![FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                }])
            }
            _ => ApiError::BadRequest(text),
        }
    }
}

/// Convert request validation failures to the field-level error list
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<FieldError> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| FieldError {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(errors)
    }
}

/// Convert token errors to API errors
///
/// Only reached on issuance paths; verification failures terminate inside the
/// access control gate.
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ApiError::Internal(msg),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert password hashing errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}
