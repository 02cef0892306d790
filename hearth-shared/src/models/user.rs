/// User model and database operations
///
/// This module provides the User model and CRUD operations for household
/// members, including the deterministic roster ordering that drives task
/// rotation and the transactional account-removal flow.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email CITEXT NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Roster ordering contract
///
/// Task rotation treats the household as an ordered cycle. Every roster read
/// in this crate sorts by `(created_at, id)` — creation time with the id as
/// a tie-break — so the ordering used to assign a turn and the ordering used
/// to advance it always agree. Do not rely on incidental storage order.
///
/// # Example
///
/// ```no_run
/// use hearth_shared::models::user::{User, CreateUser};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let user = User::create(
///     &pool,
///     CreateUser {
///         name: "Alex".to_string(),
///         email: "alex@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///     },
/// )
/// .await?;
///
/// let roster = User::roster(&pool).await?;
/// assert!(roster.iter().any(|u| u.id == user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{HouseholdError, HouseholdResult};

/// User model representing a household member
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name shown across the household views
    pub name: String,

    /// Email address (case-insensitive via CITEXT)
    ///
    /// Must be unique across all users
    pub email: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created — first component of the roster ordering
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user at signup
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address (stored case-insensitively)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address (case-insensitive via CITEXT)
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Returns the household roster in rotation order
    ///
    /// This is the single ordering contract for turn rotation: creation time
    /// ascending with the id as a deterministic tie-break. Both task
    /// creation (which assigns `roster[0]`) and task completion (which
    /// advances the index) read through this ordering.
    pub async fn roster(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at, updated_at
            FROM users
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Counts household members
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates a user's display name
    ///
    /// Returns the updated user, or None if the user doesn't exist.
    pub async fn update_name(
        pool: &PgPool,
        id: Uuid,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Removes a user and repairs task rotation state (roster shrink)
    ///
    /// Runs as a single transaction with every member row locked
    /// (`SELECT ... FOR UPDATE`), so concurrent removals serialize:
    /// 1. Rejects with [`HouseholdError::LastUser`] if this is the only
    ///    remaining member — the household cannot be emptied.
    /// 2. Deletes the user's purchases and completion records, then the
    ///    user row itself.
    /// 3. Reassigns every task whose turn-holder was the removed user to
    ///    the first member of the post-removal roster, with
    ///    `rotation_index = 0`.
    ///
    /// Resetting to index 0 rather than preserving the remaining users'
    /// relative position is a deliberate simplification; it breaks strict
    /// round-robin fairness across a removal event.
    ///
    /// # Errors
    ///
    /// - [`HouseholdError::LastUser`] if fewer than 2 users exist
    /// - [`HouseholdError::NotFound`] if the user doesn't exist
    /// - [`HouseholdError::Database`] on storage failure (rolled back)
    pub async fn delete_account(pool: &PgPool, id: Uuid) -> HouseholdResult<()> {
        let mut tx = pool.begin().await?;

        // Lock every member row so two concurrent removals serialize here;
        // the loser re-reads the shrunken roster and hits the guard below
        let roster_ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT id FROM users ORDER BY created_at ASC, id ASC FOR UPDATE",
        )
        .fetch_all(&mut *tx)
        .await?;

        if roster_ids.len() <= 1 {
            return Err(HouseholdError::LastUser);
        }

        let deleted = sqlx::query("DELETE FROM purchases WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tracing::debug!(user_id = %id, purchases = deleted.rows_affected(), "Deleted purchases");

        sqlx::query("DELETE FROM task_completions WHERE user_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(HouseholdError::NotFound("User"));
        }

        // First member of the post-removal roster takes over any task the
        // removed user still held; the locked read above fixed the ordering
        let new_holder: Option<Uuid> = roster_ids.iter().find(|&&m| m != id).copied();

        if let Some(holder) = new_holder {
            let reassigned = sqlx::query(
                r#"
                UPDATE tasks
                SET current_turn_user_id = $1, rotation_index = 0, updated_at = NOW()
                WHERE current_turn_user_id = $2
                "#,
            )
            .bind(holder)
            .bind(id)
            .execute(&mut *tx)
            .await?;

            if reassigned.rows_affected() > 0 {
                tracing::info!(
                    removed = %id,
                    new_holder = %holder,
                    tasks = reassigned.rows_affected(),
                    "Reassigned tasks after roster shrink"
                );
            }
        }

        tx.commit().await?;
        Ok(())
    }
}
