/// Dashboard endpoint
///
/// The per-member overview shown on the landing page: personal activity
/// counts, household size, recent purchases, and the next few tasks due.
///
/// # Endpoint
///
/// ```text
/// GET /v1/dashboard
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    routes::tasks::TaskResponse,
};
use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Utc;
use hearth_shared::{
    auth::middleware::AuthContext,
    models::{completion::Completion, purchase::Purchase, task::Task, user::User},
};
use serde::{Deserialize, Serialize};

/// How many recent purchases and upcoming tasks the dashboard shows
const DASHBOARD_LIMIT: i64 = 5;

/// Dashboard response
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Purchases the caller has recorded
    pub purchase_count: i64,

    /// Tasks the caller has completed
    pub completed_task_count: i64,

    /// Household size
    pub roommate_count: i64,

    /// The caller's most recent purchases
    pub recent_purchases: Vec<Purchase>,

    /// The next few tasks due, household-wide
    pub upcoming_tasks: Vec<TaskResponse>,
}

/// Aggregated overview for the authenticated member
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<DashboardResponse>> {
    let purchase_count = Purchase::count_by_user(&state.db, auth.user_id)
        .await
        .map_err(ApiError::from)?;

    let completed_task_count = Completion::count_by_user(&state.db, auth.user_id)
        .await
        .map_err(ApiError::from)?;

    let roommate_count = User::count(&state.db).await.map_err(ApiError::from)?;

    let recent_purchases =
        Purchase::list_recent_by_user(&state.db, auth.user_id, DASHBOARD_LIMIT)
            .await
            .map_err(ApiError::from)?;

    // Task::list is already sorted soonest due first
    let now = Utc::now();
    let upcoming_tasks: Vec<TaskResponse> = Task::list(&state.db)
        .await
        .map_err(ApiError::from)?
        .into_iter()
        .take(DASHBOARD_LIMIT as usize)
        .map(|task| {
            let overdue = task.is_overdue(now);
            TaskResponse { task, overdue }
        })
        .collect();

    Ok(Json(DashboardResponse {
        purchase_count,
        completed_task_count,
        roommate_count,
        recent_purchases,
        upcoming_tasks,
    }))
}
