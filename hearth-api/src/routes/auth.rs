/// Authentication endpoints
///
/// Session-cookie authentication for household members:
/// - Signup (account creation, session established immediately)
/// - Login / logout
/// - Current-user lookup
///
/// # Endpoints
///
/// - `POST /v1/auth/signup` - Create account and start a session
/// - `POST /v1/auth/login` - Start a session
/// - `POST /v1/auth/logout` - Clear the session cookie
/// - `GET /v1/auth/me` - Current authenticated user
///
/// Signup and login respond with a `Set-Cookie` header carrying the signed
/// session token (httpOnly, 7 days) alongside the JSON body.

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult, ValidationErrorDetail},
    views::View,
};
use axum::{
    extract::{Extension, State},
    http::{header::SET_COOKIE, StatusCode},
    response::AppendHeaders,
    Json,
};
use chrono::{DateTime, Utc};
use hearth_shared::{
    auth::{
        middleware::{clear_session_cookie, session_cookie, AuthContext},
        password, session,
    },
    models::user::{CreateUser, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// User payload returned by auth endpoints
///
/// Never includes the password hash.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Logout response
#[derive(Debug, Serialize, Deserialize)]
pub struct LogoutResponse {
    /// Always true; the cookie in the response does the actual work
    pub logged_out: bool,
}

/// Create a new household member account
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/signup
/// Content-Type: application/json
///
/// {
///   "name": "Alex",
///   "email": "alex@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (including weak password)
/// - `409 Conflict`: Email already exists
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(
    StatusCode,
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<UserResponse>,
)> {
    req.validate().map_err(validation_error)?;

    password::validate_password_strength(&req.password).map_err(|message| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let claims = session::SessionClaims::new(user.id);
    let token = session::create_token(&claims, state.session_secret())?;

    tracing::info!(user_id = %user.id, "New member signed up");
    state.views.invalidate(&[View::Roommates, View::Dashboard]);

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Json(user.into()),
    ))
}

/// Start a session for an existing member
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "alex@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `401 Unauthorized`: Invalid credentials (email and password failures
///   are indistinguishable on purpose)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<UserResponse>)> {
    req.validate().map_err(validation_error)?;

    let user = User::find_by_email(&state.db, &req.email)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = session::SessionClaims::new(user.id);
    let token = session::create_token(&claims, state.session_secret())?;

    tracing::debug!(user_id = %user.id, "Member logged in");

    Ok((
        AppendHeaders([(SET_COOKIE, session_cookie(&token))]),
        Json(user.into()),
    ))
}

/// End the session
///
/// Stateless: clearing the cookie is all there is to it. Always succeeds,
/// with or without a valid session on the request.
pub async fn logout(
) -> (AppendHeaders<[(axum::http::HeaderName, String); 1]>, Json<LogoutResponse>) {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(LogoutResponse { logged_out: true }),
    )
}

/// Current authenticated user
///
/// # Errors
///
/// - `401 Unauthorized`: No valid session
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<UserResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::Unauthorized("Unknown user".to_string()))?;

    Ok(Json(user.into()))
}
