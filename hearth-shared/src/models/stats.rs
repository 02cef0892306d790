/// Contribution statistics
///
/// Aggregates backing the fairness views: per-member purchase counts,
/// completed-task counts, and their sum. Read-only.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Per-member contribution summary for the fairness view
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ContributionStats {
    /// The member
    pub user_id: Uuid,

    /// Their display name
    pub name: String,

    /// Purchases they recorded
    pub purchase_count: i64,

    /// Tasks they completed
    pub task_count: i64,

    /// Sum of the two — the "total contributions" score
    pub total_contributions: i64,
}

impl ContributionStats {
    /// Fetches contribution stats for every household member, in roster
    /// order
    ///
    /// Members with no activity appear with zero counts.
    pub async fn for_household(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let stats = sqlx::query_as::<_, ContributionStats>(
            r#"
            SELECT u.id AS user_id,
                   u.name,
                   COALESCE(p.purchase_count, 0) AS purchase_count,
                   COALESCE(c.task_count, 0) AS task_count,
                   COALESCE(p.purchase_count, 0) + COALESCE(c.task_count, 0)
                       AS total_contributions
            FROM users u
            LEFT JOIN (
                SELECT user_id, COUNT(*) AS purchase_count
                FROM purchases
                GROUP BY user_id
            ) p ON p.user_id = u.id
            LEFT JOIN (
                SELECT user_id, COUNT(*) AS task_count
                FROM task_completions
                GROUP BY user_id
            ) c ON c.user_id = u.id
            ORDER BY u.created_at ASC, u.id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(stats)
    }
}
