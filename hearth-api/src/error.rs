/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to appropriate HTTP status codes.
///
/// Every variant carries a distinct machine-readable `error` code in the
/// JSON body, so callers can tell a business-rule rejection (wrong turn,
/// duplicate completion, last user, ...) apart from an infrastructure
/// failure without parsing message text.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hearth_shared::auth::middleware::AuthError;
use hearth_shared::auth::password::PasswordError;
use hearth_shared::auth::session::SessionError;
use hearth_shared::error::HouseholdError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401) - no valid session
    Unauthorized(String),

    /// Forbidden (403) - acting on another user's resource
    Forbidden(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409) - e.g., duplicate email
    Conflict(String),

    /// Unprocessable entity (422) - validation errors
    ValidationError(Vec<ValidationErrorDetail>),

    /// Conflict (409) - completion attempted by a non-turn-holder
    NotYourTurn,

    /// Conflict (409) - completion re-attempted within the debounce window
    DuplicateCompletion,

    /// Conflict (409) - task creation with an empty roster
    NoUsers,

    /// Conflict (409) - the last remaining user cannot leave
    LastUser,

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "not_your_turn", "last_user")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::NotYourTurn => write!(f, "It is not your turn for this task"),
            ApiError::DuplicateCompletion => write!(f, "Task was already completed moments ago"),
            ApiError::NoUsers => write!(f, "No users found to assign the task to"),
            ApiError::LastUser => write!(f, "Cannot delete the last user in the household"),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::ValidationError(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::NotYourTurn => (
                StatusCode::CONFLICT,
                "not_your_turn",
                "It is not your turn for this task".to_string(),
                None,
            ),
            ApiError::DuplicateCompletion => (
                StatusCode::CONFLICT,
                "duplicate_completion",
                "Task was already completed moments ago".to_string(),
                None,
            ),
            ApiError::NoUsers => (
                StatusCode::CONFLICT,
                "no_users",
                "No users found to assign the task to".to_string(),
                None,
            ),
            ApiError::LastUser => (
                StatusCode::CONFLICT,
                "last_user",
                "Cannot delete the last user in the household".to_string(),
                None,
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert household domain errors to API errors
impl From<HouseholdError> for ApiError {
    fn from(err: HouseholdError) -> Self {
        match err {
            HouseholdError::Validation(msg) => ApiError::ValidationError(vec![
                ValidationErrorDetail {
                    field: "body".to_string(),
                    message: msg,
                },
            ]),
            HouseholdError::NotFound(what) => ApiError::NotFound(format!("{} not found", what)),
            HouseholdError::Forbidden(msg) => ApiError::Forbidden(msg),
            HouseholdError::NotYourTurn => ApiError::NotYourTurn,
            HouseholdError::DuplicateCompletion => ApiError::DuplicateCompletion,
            HouseholdError::NoUsers => ApiError::NoUsers,
            HouseholdError::LastUser => ApiError::LastUser,
            HouseholdError::Database(err) => ApiError::from(err),
        }
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for unique constraint violations
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("Email already exists".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert auth extraction errors to API errors
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => {
                ApiError::Unauthorized("Missing credentials".to_string())
            }
            AuthError::InvalidToken(msg) => ApiError::Unauthorized(msg),
            AuthError::UnknownUser => ApiError::Unauthorized("Unknown user".to_string()),
            AuthError::DatabaseError(msg) => ApiError::InternalError(msg),
        }
    }
}

/// Convert session token errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Expired => ApiError::Unauthorized("Session expired".to_string()),
            _ => ApiError::Unauthorized(format!("Invalid session: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Converts `validator` failures into a 422 with per-field details
pub fn validation_error(errors: validator::ValidationErrors) -> ApiError {
    let details: Vec<ValidationErrorDetail> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| ValidationErrorDetail {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string()),
            })
        })
        .collect();

    ApiError::ValidationError(details)
}
