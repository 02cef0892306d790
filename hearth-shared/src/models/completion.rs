/// Completion record model
///
/// An append-only log of task completions. One row is inserted per
/// successful completion and never mutated or reused — it feeds the
/// contribution statistics and the duplicate-completion debounce.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_completions (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id),
///     completed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// Immutable log entry recording that a user completed a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Completion {
    /// Unique record ID
    pub id: Uuid,

    /// The completed task
    pub task_id: Uuid,

    /// The member who completed it
    pub user_id: Uuid,

    /// When the completion happened
    pub completed_at: DateTime<Utc>,
}

impl Completion {
    /// Debounce window for repeat completions, in seconds
    ///
    /// A completion by the same (task, user) pair within this window is
    /// rejected as a duplicate. This is a heuristic guard against rapid
    /// double submits, NOT an idempotency key: it does not cover a
    /// different double-submit pattern outside the window, and it will
    /// reject a legitimately repeated completion inside it. Whether that
    /// second case matters is an open product question.
    pub const DEBOUNCE_SECONDS: i64 = 60;

    /// Appends a completion record
    ///
    /// Accepts any executor so it can run inside the completion
    /// transaction.
    pub async fn record<'e, E>(
        executor: E,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<Self, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let completion = sqlx::query_as::<_, Completion>(
            r#"
            INSERT INTO task_completions (task_id, user_id)
            VALUES ($1, $2)
            RETURNING id, task_id, user_id, completed_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_one(executor)
        .await?;

        Ok(completion)
    }

    /// Checks for a completion by this (task, user) pair within the
    /// debounce window
    pub async fn recent_exists<'e, E>(
        executor: E,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM task_completions
                WHERE task_id = $1
                  AND user_id = $2
                  AND completed_at >= NOW() - make_interval(secs => $3)
            )
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .bind(Self::DEBOUNCE_SECONDS as f64)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Counts completions by a user (their contribution to the household)
    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM task_completions WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Lists a task's completion history, newest first
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let completions = sqlx::query_as::<_, Completion>(
            r#"
            SELECT id, task_id, user_id, completed_at
            FROM task_completions
            WHERE task_id = $1
            ORDER BY completed_at DESC
            LIMIT $2
            "#,
        )
        .bind(task_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(completions)
    }
}
