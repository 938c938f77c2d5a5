//! Stock levels.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use juliecraft_core::ProductId;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::{LOW_STOCK_THRESHOLD, Product};
use crate::state::AppState;

/// Products below the low-stock threshold, lowest first.
#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn low_stock(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<Product>>> {
    let products = state
        .backend()?
        .products()
        .list_low_stock(LOW_STOCK_THRESHOLD)
        .await?;
    Ok(Json(products))
}

#[derive(Debug, Deserialize)]
pub struct SetStockRequest {
    pub stock: i32,
}

/// Overwrite a product's stock level.
#[instrument(skip_all, fields(admin_id = %admin.caller.id, product_id = %id))]
pub async fn set_stock(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(body): ApiJson<SetStockRequest>,
) -> Result<Json<Product>> {
    if body.stock < 0 {
        return Err(AppError::bad_request("stock cannot be negative"));
    }

    let product = state
        .backend()?
        .products()
        .set_stock(id, body.stock)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    tracing::info!(stock = product.stock, "Stock updated");
    if product.is_low_stock() {
        tracing::warn!(
            stock = product.stock,
            threshold = LOW_STOCK_THRESHOLD,
            "Product is below the low-stock threshold"
        );
    }
    Ok(Json(product))
}
