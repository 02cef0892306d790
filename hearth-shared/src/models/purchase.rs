/// Purchase model and database operations
///
/// Grocery expenses recorded by household members. Plain ownership-scoped
/// CRUD — purchases play no part in task rotation, but they feed the
/// contribution statistics.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE purchases (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     item VARCHAR(255) NOT NULL,
///     quantity INTEGER NOT NULL,
///     price DOUBLE PRECISION NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id),
///     purchase_date TIMESTAMPTZ NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Purchase model representing a grocery expense
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Purchase {
    /// Unique purchase ID
    pub id: Uuid,

    /// What was bought
    pub item: String,

    /// How many
    pub quantity: i32,

    /// Price paid
    pub price: f64,

    /// The member who recorded (and owns) this purchase
    pub user_id: Uuid,

    /// When the purchase was made
    pub purchase_date: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,

    /// When the record was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a new purchase
#[derive(Debug, Clone)]
pub struct CreatePurchase {
    /// Owning user
    pub user_id: Uuid,

    /// Item name (required, non-empty)
    pub item: String,

    /// Quantity bought
    pub quantity: i32,

    /// Price paid
    pub price: f64,

    /// When the purchase was made
    pub purchase_date: DateTime<Utc>,
}

/// Input for editing an existing purchase
#[derive(Debug, Clone)]
pub struct UpdatePurchase {
    /// New item name
    pub item: String,

    /// New quantity
    pub quantity: i32,

    /// New price
    pub price: f64,

    /// New purchase date
    pub purchase_date: DateTime<Utc>,
}

impl Purchase {
    /// Records a new purchase
    pub async fn create(pool: &PgPool, data: CreatePurchase) -> Result<Self, sqlx::Error> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (item, quantity, price, user_id, purchase_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, item, quantity, price, user_id, purchase_date,
                      created_at, updated_at
            "#,
        )
        .bind(data.item)
        .bind(data.quantity)
        .bind(data.price)
        .bind(data.user_id)
        .bind(data.purchase_date)
        .fetch_one(pool)
        .await?;

        Ok(purchase)
    }

    /// Finds a purchase by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, item, quantity, price, user_id, purchase_date,
                   created_at, updated_at
            FROM purchases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(purchase)
    }

    /// Lists all household purchases, newest first
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, item, quantity, price, user_id, purchase_date,
                   created_at, updated_at
            FROM purchases
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }

    /// Lists a user's most recent purchases
    pub async fn list_recent_by_user(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, item, quantity, price, user_id, purchase_date,
                   created_at, updated_at
            FROM purchases
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(purchases)
    }

    /// Counts purchases recorded by a user
    pub async fn count_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Updates a purchase
    ///
    /// Ownership is checked by the caller; this only touches the row.
    /// Returns the updated purchase, or None if it doesn't exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdatePurchase,
    ) -> Result<Option<Self>, sqlx::Error> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases
            SET item = $2, quantity = $3, price = $4, purchase_date = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, item, quantity, price, user_id, purchase_date,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.item)
        .bind(data.quantity)
        .bind(data.price)
        .bind(data.purchase_date)
        .fetch_optional(pool)
        .await?;

        Ok(purchase)
    }

    /// Deletes a purchase
    ///
    /// Returns true if the purchase existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
