/// Roommate endpoints
///
/// The household roster with contribution statistics, self-service profile
/// edits, and account removal.
///
/// # Endpoints
///
/// - `GET /v1/roommates` - Roster with per-member contribution stats
/// - `PATCH /v1/roommates/:id` - Update own display name (self only)
/// - `DELETE /v1/roommates/:id` - Leave the household (self only)
///
/// Profile edits and removal are strictly self-service: acting on another
/// member's account is rejected with 403 regardless of any other state.

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
    views::View,
};
use axum::{
    extract::{Extension, Path, State},
    http::header::SET_COOKIE,
    response::AppendHeaders,
    Json,
};
use hearth_shared::{
    auth::middleware::{clear_session_cookie, AuthContext},
    models::{stats::ContributionStats, user::User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::auth::UserResponse;

/// Update roommate request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoommateRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Account removal response
#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveRoommateResponse {
    /// Always true when removal succeeded
    pub removed: bool,

    /// Hint that the caller's session is over; the cleared cookie in the
    /// same response does the actual work
    pub session_ended: bool,
}

/// List the household roster with contribution stats
///
/// Members appear in roster order with their purchase count, completed-task
/// count, and total contribution score. Zero-activity members are included.
pub async fn list_roommates(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ContributionStats>>> {
    let stats = ContributionStats::for_household(&state.db)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(stats))
}

/// Update a member's display name
///
/// Self-service only.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `403 Forbidden`: Editing another member's profile
/// - `404 Not Found`: No such user
pub async fn update_roommate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoommateRequest>,
) -> ApiResult<Json<UserResponse>> {
    if id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }

    req.validate().map_err(validation_error)?;

    let user = User::update_name(&state.db, id, &req.name)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    state.views.invalidate(&[View::Roommates, View::Dashboard]);

    Ok(Json(user.into()))
}

/// Leave the household
///
/// Self-service only. Removes the member's purchases and completion history,
/// reassigns any task they currently held to the new roster head, and ends
/// the caller's session by clearing the cookie.
///
/// # Errors
///
/// - `403 Forbidden`: Removing another member
/// - `409 Conflict` (`last_user`): The last remaining member cannot leave
/// - `404 Not Found`: No such user
pub async fn delete_roommate(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<(
    AppendHeaders<[(axum::http::HeaderName, String); 1]>,
    Json<RemoveRoommateResponse>,
)> {
    if id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only remove your own account".to_string(),
        ));
    }

    User::delete_account(&state.db, id).await?;

    tracing::info!(user_id = %id, "Member left the household");
    state.views.invalidate(&[
        View::Roommates,
        View::Dashboard,
        View::Cleaning,
        View::Groceries,
    ]);

    Ok((
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(RemoveRoommateResponse {
            removed: true,
            session_ended: true,
        }),
    ))
}
