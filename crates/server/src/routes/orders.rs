//! Order tracking and admin status changes.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use juliecraft_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::RequireAdmin;
use crate::models::{Order, TrackedOrder};
use crate::state::AppState;

/// Public lookup by order number. No authentication: knowing the number is
/// enough, as on a printed receipt.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    ApiPath(order_number): ApiPath<String>,
) -> Result<Json<TrackedOrder>> {
    let backend = state.backend()?;
    let order_number = order_number.trim();
    if order_number.is_empty() {
        return Err(AppError::bad_request("Order number is required"));
    }

    backend
        .orders()
        .find_by_number(order_number)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Set an order's status.
#[instrument(skip_all, fields(admin_id = %admin.caller.id, order_id = %id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<OrderId>,
    ApiJson(body): ApiJson<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    let order = state
        .backend()?
        .orders()
        .update_status(id, body.status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))?;

    tracing::info!(order_id = %id, status = %body.status, "Order status updated");
    Ok(Json(order))
}
