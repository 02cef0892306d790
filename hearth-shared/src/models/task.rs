/// Task model and the rotation & completion tracker
///
/// A task is a recurring chore owned by exactly one household member at a
/// time. Completing it appends an immutable completion record and advances
/// the turn through the roster in round-robin order.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     due_date TIMESTAMPTZ NOT NULL,
///     current_turn_user_id UUID NOT NULL REFERENCES users(id),
///     rotation_index INTEGER NOT NULL DEFAULT 0,
///     last_completed_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Invariant
///
/// `current_turn_user_id` always equals the roster member at
/// `rotation_index` (roster ordered by `created_at, id`), except transiently
/// inside the user-removal transaction in
/// [`User::delete_account`](crate::models::user::User::delete_account).
///
/// # Concurrency
///
/// [`Task::complete`] runs its read-check-write sequence inside one
/// transaction with the task row locked (`SELECT ... FOR UPDATE`), and the
/// final update is additionally guarded by a compare-and-swap on
/// `(current_turn_user_id, rotation_index)`. Two racing completion attempts
/// serialize on the row lock; the loser fails the turn check and leaves no
/// partial state behind.
///
/// # Example
///
/// ```no_run
/// use hearth_shared::models::task::{Task, CreateTask};
/// use chrono::Utc;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, me: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let task = Task::create(
///     &pool,
///     CreateTask {
///         name: "Take out the bins".to_string(),
///         description: "Green bin on Tuesdays".to_string(),
///         due_date: Utc::now(),
///     },
/// )
/// .await?;
///
/// // Only the current turn-holder may complete it
/// let task = Task::complete(&pool, task.id, me).await?;
/// println!("Next up: {}", task.current_turn_user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{HouseholdError, HouseholdResult};
use crate::models::completion::Completion;
use crate::rotation;

/// Task model representing a recurring chore
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short task name (e.g. "Clean the kitchen")
    pub name: String,

    /// Longer description of what the chore involves
    pub description: String,

    /// When the task is next due; overdue detection is a read-time
    /// comparison against the wall clock, never persisted state
    pub due_date: DateTime<Utc>,

    /// The member whose turn it currently is
    pub current_turn_user_id: Uuid,

    /// Zero-based position of the turn-holder in the roster ordering
    pub rotation_index: i32,

    /// When the task was last completed (None if never)
    pub last_completed_at: Option<DateTime<Utc>>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task name (required, non-empty)
    pub name: String,

    /// Task description (required, non-empty)
    pub description: String,

    /// Due date (required)
    pub due_date: DateTime<Utc>,
}

/// Input for editing an existing task
///
/// All three fields are required, matching the edit form.
#[derive(Debug, Clone)]
pub struct UpdateTask {
    /// New task name
    pub name: String,

    /// New description
    pub description: String,

    /// New due date
    pub due_date: DateTime<Utc>,
}

impl Task {
    /// Creates a new task and initializes its rotation
    ///
    /// The task is assigned to the first user in the roster ordering with
    /// `rotation_index = 0`.
    ///
    /// # Errors
    ///
    /// - [`HouseholdError::Validation`] if name or description is empty
    /// - [`HouseholdError::NoUsers`] if the roster is empty
    /// - [`HouseholdError::Database`] on storage failure
    pub async fn create(pool: &PgPool, data: CreateTask) -> HouseholdResult<Self> {
        if data.name.trim().is_empty() {
            return Err(HouseholdError::Validation("name is required".to_string()));
        }
        if data.description.trim().is_empty() {
            return Err(HouseholdError::Validation(
                "description is required".to_string(),
            ));
        }

        let first_holder: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users ORDER BY created_at ASC, id ASC LIMIT 1")
                .fetch_optional(pool)
                .await?;

        let first_holder = first_holder.ok_or(HouseholdError::NoUsers)?;

        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (name, description, due_date, current_turn_user_id, rotation_index)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id, name, description, due_date, current_turn_user_id,
                      rotation_index, last_completed_at, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.description)
        .bind(data.due_date)
        .bind(first_holder)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, due_date, current_turn_user_id,
                   rotation_index, last_completed_at, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, soonest due first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, due_date, current_turn_user_id,
                   rotation_index, last_completed_at, created_at, updated_at
            FROM tasks
            ORDER BY due_date ASC, created_at ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Updates a task's name, description, and due date
    ///
    /// Rotation state is untouched — editing a chore does not move the turn.
    /// Returns the updated task, or None if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> HouseholdResult<Option<Self>> {
        if data.name.trim().is_empty() {
            return Err(HouseholdError::Validation("name is required".to_string()));
        }
        if data.description.trim().is_empty() {
            return Err(HouseholdError::Validation(
                "description is required".to_string(),
            ));
        }

        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET name = $2, description = $3, due_date = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, due_date, current_turn_user_id,
                      rotation_index, last_completed_at, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.description)
        .bind(data.due_date)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Deletes a task
    ///
    /// Its completion history cascades with it (FK `ON DELETE CASCADE`).
    /// Returns true if the task existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Completes a task as the acting user and advances the rotation
    ///
    /// Preconditions, checked in order inside one transaction:
    /// 1. The task exists — else [`HouseholdError::NotFound`]
    /// 2. The acting user is the current turn-holder — else
    ///    [`HouseholdError::NotYourTurn`] (no side effects)
    /// 3. No completion by this (task, user) pair exists within the
    ///    debounce window — else [`HouseholdError::DuplicateCompletion`].
    ///    The window is a double-submit heuristic, not an idempotency key;
    ///    see [`Completion::DEBOUNCE_SECONDS`].
    ///
    /// Effect: a completion record is appended, then the task advances to
    /// `(rotation_index + 1) mod N` over the deterministic roster. The
    /// advance is a conditional update guarded by the previously read
    /// `(current_turn_user_id, rotation_index)`; zero rows affected is
    /// reported as [`HouseholdError::NotYourTurn`]. Any failure rolls the
    /// whole transaction back — there is no partial advance.
    pub async fn complete(pool: &PgPool, task_id: Uuid, acting_user: Uuid) -> HouseholdResult<Self> {
        let mut tx = pool.begin().await?;

        // Lock the task row for the whole check-then-write sequence so two
        // racing completion attempts serialize here
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, name, description, due_date, current_turn_user_id,
                   rotation_index, last_completed_at, created_at, updated_at
            FROM tasks
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(task_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(HouseholdError::NotFound("Task"))?;

        if task.current_turn_user_id != acting_user {
            return Err(HouseholdError::NotYourTurn);
        }

        if Completion::recent_exists(&mut *tx, task_id, acting_user).await? {
            return Err(HouseholdError::DuplicateCompletion);
        }

        let roster: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM users ORDER BY created_at ASC, id ASC")
                .fetch_all(&mut *tx)
                .await?;

        let next_index =
            rotation::next_index(task.rotation_index, roster.len()).ok_or(HouseholdError::NoUsers)?;
        let next_holder =
            rotation::holder_at(&roster, next_index).ok_or(HouseholdError::NoUsers)?;

        Completion::record(&mut *tx, task_id, acting_user).await?;

        // Compare-and-swap on the state read above; the row lock already
        // excludes interleavings, the guard protects callers that skip it
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET current_turn_user_id = $2, rotation_index = $3,
                last_completed_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND current_turn_user_id = $4 AND rotation_index = $5
            RETURNING id, name, description, due_date, current_turn_user_id,
                      rotation_index, last_completed_at, created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(next_holder)
        .bind(next_index)
        .bind(acting_user)
        .bind(task.rotation_index)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(HouseholdError::NotYourTurn)?;

        tx.commit().await?;

        tracing::info!(
            task_id = %task_id,
            completed_by = %acting_user,
            next_holder = %updated.current_turn_user_id,
            rotation_index = updated.rotation_index,
            "Task completed, turn advanced"
        );

        Ok(updated)
    }

    /// Whether the task is overdue at the given instant
    ///
    /// Purely a read-time comparison; there is no persisted "expired" state.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_task(due: DateTime<Utc>) -> Task {
        Task {
            id: Uuid::new_v4(),
            name: "Dishes".to_string(),
            description: "Wash and dry".to_string(),
            due_date: due,
            current_turn_user_id: Uuid::new_v4(),
            rotation_index: 0,
            last_completed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_overdue() {
        let now = Utc::now();
        assert!(sample_task(now - Duration::hours(1)).is_overdue(now));
        assert!(!sample_task(now + Duration::hours(1)).is_overdue(now));
    }

    #[test]
    fn test_task_serializes_rotation_state() {
        let task = sample_task(Utc::now());
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["rotation_index"], 0);
        assert!(json["current_turn_user_id"].is_string());
        assert!(json["last_completed_at"].is_null());
    }
}
