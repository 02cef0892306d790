/// Cleaning task endpoints
///
/// CRUD for recurring chores plus the completion operation that drives the
/// round-robin turn rotation.
///
/// # Endpoints
///
/// - `GET /v1/tasks` - List all tasks, soonest due first
/// - `POST /v1/tasks` - Create a task (assigned to the roster head)
/// - `PATCH /v1/tasks/:id` - Edit name/description/due date
/// - `DELETE /v1/tasks/:id` - Delete a task and its completion history
/// - `POST /v1/tasks/:id/complete` - Complete as the turn-holder, advance
///   the turn
///
/// Any authenticated member may create, edit, or delete any task; only the
/// current turn-holder may complete one.

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
    views::View,
};
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use hearth_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, UpdateTask},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Task description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// When the task is next due
    pub due_date: DateTime<Utc>,
}

/// Update task request
///
/// All fields required, matching the edit form.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New task name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// New description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// New due date
    pub due_date: DateTime<Utc>,
}

/// Task payload with the read-time overdue flag
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    /// The task itself
    #[serde(flatten)]
    pub task: Task,

    /// Whether the due date has passed (computed at read time)
    pub overdue: bool,
}

impl TaskResponse {
    fn now(task: Task) -> Self {
        let overdue = task.is_overdue(Utc::now());
        Self { task, overdue }
    }
}

/// List all cleaning tasks
///
/// Sorted soonest due first, each with its current turn-holder and a
/// read-time overdue flag.
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<Vec<TaskResponse>>> {
    let tasks = Task::list(&state.db).await.map_err(ApiError::from)?;

    Ok(Json(tasks.into_iter().map(TaskResponse::now).collect()))
}

/// Create a cleaning task
///
/// The task is assigned to the first member of the roster.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `409 Conflict` (`no_users`): The household has no members
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate().map_err(validation_error)?;

    let task = Task::create(
        &state.db,
        CreateTask {
            name: req.name,
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?;

    tracing::info!(task_id = %task.id, created_by = %auth.user_id, "Task created");
    state.views.invalidate(&[View::Cleaning, View::Dashboard]);

    Ok((StatusCode::CREATED, Json(TaskResponse::now(task))))
}

/// Edit a task's name, description, and due date
///
/// Rotation state is untouched.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `404 Not Found`: No such task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<TaskResponse>> {
    req.validate().map_err(validation_error)?;

    let task = Task::update(
        &state.db,
        id,
        UpdateTask {
            name: req.name,
            description: req.description,
            due_date: req.due_date,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::debug!(task_id = %id, updated_by = %auth.user_id, "Task updated");
    state.views.invalidate(&[View::Cleaning, View::Dashboard]);

    Ok(Json(TaskResponse::now(task)))
}

/// Delete a task
///
/// Its completion history is removed with it.
///
/// # Errors
///
/// - `404 Not Found`: No such task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = Task::delete(&state.db, id).await.map_err(ApiError::from)?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    tracing::info!(task_id = %id, deleted_by = %auth.user_id, "Task deleted");
    state.views.invalidate(&[View::Cleaning, View::Dashboard]);

    Ok(StatusCode::NO_CONTENT)
}

/// Complete a task as the current turn-holder
///
/// Records the completion and advances the turn to the next roster member.
/// The whole operation is atomic: a rejected attempt leaves no trace.
///
/// # Errors
///
/// - `404 Not Found`: No such task
/// - `409 Conflict` (`not_your_turn`): The caller is not the turn-holder
/// - `409 Conflict` (`duplicate_completion`): Same member completed this
///   task within the last minute
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::complete(&state.db, id, auth.user_id).await?;

    state
        .views
        .invalidate(&[View::Cleaning, View::Dashboard, View::Roommates]);

    Ok(Json(TaskResponse::now(task)))
}
