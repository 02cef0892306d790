/// Grocery purchase endpoints
///
/// Ownership-scoped CRUD for grocery expenses. Everyone can see the whole
/// household's purchases; only the member who recorded a purchase may edit
/// or delete it.
///
/// # Endpoints
///
/// - `GET /v1/purchases` - List all household purchases, newest first
/// - `POST /v1/purchases` - Record a purchase (owned by the caller)
/// - `PATCH /v1/purchases/:id` - Edit an owned purchase
/// - `DELETE /v1/purchases/:id` - Delete an owned purchase

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
    models::purchase::{CreatePurchase, Purchase, UpdatePurchase},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create purchase request
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePurchaseRequest {
    /// Item name
    #[validate(length(min = 1, max = 255, message = "Item must be 1-255 characters"))]
    pub item: String,

    /// Quantity bought
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    /// Price paid
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    /// When the purchase was made (defaults to now)
    pub purchase_date: Option<DateTime<Utc>>,
}

/// Update purchase request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePurchaseRequest {
    /// New item name
    #[validate(length(min = 1, max = 255, message = "Item must be 1-255 characters"))]
    pub item: String,

    /// New quantity
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,

    /// New price
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,

    /// New purchase date
    pub purchase_date: DateTime<Utc>,
}

/// List all household purchases
pub async fn list_purchases(State(state): State<AppState>) -> ApiResult<Json<Vec<Purchase>>> {
    let purchases = Purchase::list(&state.db).await.map_err(ApiError::from)?;

    Ok(Json(purchases))
}

/// Record a grocery purchase owned by the caller
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_purchase(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreatePurchaseRequest>,
) -> ApiResult<(StatusCode, Json<Purchase>)> {
    req.validate().map_err(validation_error)?;

    let purchase = Purchase::create(
        &state.db,
        CreatePurchase {
            user_id: auth.user_id,
            item: req.item,
            quantity: req.quantity,
            price: req.price,
            purchase_date: req.purchase_date.unwrap_or_else(Utc::now),
        },
    )
    .await
    .map_err(ApiError::from)?;

    tracing::debug!(purchase_id = %purchase.id, user_id = %auth.user_id, "Purchase recorded");
    state
        .views
        .invalidate(&[View::Groceries, View::Dashboard, View::Roommates]);

    Ok((StatusCode::CREATED, Json(purchase)))
}

/// Edit an owned purchase
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed
/// - `404 Not Found`: No such purchase
/// - `403 Forbidden`: The purchase belongs to another member
pub async fn update_purchase(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePurchaseRequest>,
) -> ApiResult<Json<Purchase>> {
    req.validate().map_err(validation_error)?;

    let existing = Purchase::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Purchase not found".to_string()))?;

    if existing.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only edit your own purchases".to_string(),
        ));
    }

    let purchase = Purchase::update(
        &state.db,
        id,
        UpdatePurchase {
            item: req.item,
            quantity: req.quantity,
            price: req.price,
            purchase_date: req.purchase_date,
        },
    )
    .await
    .map_err(ApiError::from)?
    .ok_or_else(|| ApiError::NotFound("Purchase not found".to_string()))?;

    state
        .views
        .invalidate(&[View::Groceries, View::Dashboard, View::Roommates]);

    Ok(Json(purchase))
}

/// Delete an owned purchase
///
/// # Errors
///
/// - `404 Not Found`: No such purchase
/// - `403 Forbidden`: The purchase belongs to another member
pub async fn delete_purchase(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let existing = Purchase::find_by_id(&state.db, id)
        .await
        .map_err(ApiError::from)?
        .ok_or_else(|| ApiError::NotFound("Purchase not found".to_string()))?;

    if existing.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "You can only delete your own purchases".to_string(),
        ));
    }

    Purchase::delete(&state.db, id).await.map_err(ApiError::from)?;

    tracing::debug!(purchase_id = %id, user_id = %auth.user_id, "Purchase deleted");
    state
        .views
        .invalidate(&[View::Groceries, View::Dashboard, View::Roommates]);

    Ok(StatusCode::NO_CONTENT)
}
