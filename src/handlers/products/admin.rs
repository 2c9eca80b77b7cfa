//! Admin-gated mutation handlers. The gate has already verified the token and
//! the admin role by the time these run; `AuthUser` carries the actor.

use axum::extract::{Extension, Path, State};
use axum::Json;
use futures::future::try_join_all;
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::catalog::product::InputError;
use crate::catalog::{Product, ProductInput};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, AuthUser};

/// POST /api/products - create a product
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(input): Json<ProductInput>,
) -> Result<ApiResponse<Product>, ApiError> {
    let draft = input.into_draft()?;
    let product = state.store.insert(&draft).await?;
    tracing::info!(admin = %user.id, product = %product.id, "product created");
    Ok(ApiResponse::created(product).with_message("Product created!"))
}

/// PUT /api/products/:id - replace a product's fields.
///
/// This is a replace, not a merge: optional fields omitted from the payload
/// are reset to their creation defaults, and `name`/`unitPrice` are required
/// here just as they are on create.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ProductInput>,
) -> Result<ApiResponse<Product>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Product not found"))?;
    let draft = input.into_draft()?;
    let product = state.store.replace(id, &draft).await?;
    Ok(ApiResponse::success(product).with_message("Product updated!"))
}

#[derive(Debug, Deserialize)]
pub struct BulkStockPayload {
    pub updates: Vec<StockUpdate>,
}

#[derive(Debug, Deserialize)]
pub struct StockUpdate {
    pub id: String,
    pub quantity: i64,
}

/// PUT /api/products/bulk-update-stock - apply per-item quantity updates.
///
/// Items are updated concurrently with no ordering guarantee and no atomicity
/// across the batch: the first failing item fails the whole response even
/// though other updates may already have been applied.
pub async fn bulk_update_stock(
    State(state): State<AppState>,
    Json(payload): Json<BulkStockPayload>,
) -> Result<ApiResponse<Vec<Product>>, ApiError> {
    for update in &payload.updates {
        if update.quantity < 0 {
            return Err(InputError::NegativeValue("quantity").into());
        }
    }

    let results = try_join_all(
        payload
            .updates
            .iter()
            .map(|update| apply_stock_update(&state, update)),
    )
    .await?;

    Ok(ApiResponse::success(results).with_message("Stock updated for multiple products"))
}

async fn apply_stock_update(state: &AppState, update: &StockUpdate) -> Result<Product, ApiError> {
    let id =
        Uuid::parse_str(&update.id).map_err(|_| ApiError::not_found("Product not found"))?;
    Ok(state.store.set_quantity(id, update.quantity).await?)
}

/// DELETE /api/products/:id - hard delete, returning the removed record
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Product>, ApiError> {
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::not_found("Product not found"))?;
    let product = state.store.delete(id).await?;
    tracing::info!(admin = %user.id, product = %product.id, "product deleted");
    Ok(ApiResponse::success(product).with_message("Product deleted!"))
}
