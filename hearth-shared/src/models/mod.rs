/// Database models for Hearth
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: Household members; defines the roster ordering contract
/// - `task`: Recurring chores with round-robin turn rotation
/// - `completion`: Append-only task completion log
/// - `purchase`: Ownership-scoped grocery expenses
/// - `stats`: Contribution aggregates for the fairness views
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
/// # Ok(())
/// # }
/// ```

pub mod completion;
pub mod purchase;
pub mod stats;
pub mod task;
pub mod user;
