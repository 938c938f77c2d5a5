//! Saved carts keyed by user id or guest session id.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiQuery};
use crate::models::CartKey;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveCartRequest {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub cart_data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LoadCartQuery {
    pub user_id: Option<String>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveCartResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct LoadCartResponse {
    pub cart_data: Option<Value>,
}

fn cart_key(user_id: Option<&str>, session_id: Option<&str>) -> Result<CartKey> {
    CartKey::from_parts(user_id, session_id)
        .ok_or_else(|| AppError::bad_request("user_id or session_id is required"))
}

/// Upsert the cart for the given key. Last write wins.
#[instrument(skip(state, body))]
pub async fn save(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SaveCartRequest>,
) -> Result<Json<SaveCartResponse>> {
    let backend = state.backend()?;
    let key = cart_key(body.user_id.as_deref(), body.session_id.as_deref())?;
    let cart_data = match body.cart_data {
        Some(Value::Null) | None => return Err(AppError::bad_request("cart_data is required")),
        Some(data) => data,
    };

    backend.carts().save(&key, &cart_data).await?;
    tracing::debug!(%key, "Cart saved");

    Ok(Json(SaveCartResponse { success: true }))
}

/// Load the cart for the given key; `cart_data` is null when none was saved.
#[instrument(skip(state))]
pub async fn load(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<LoadCartQuery>,
) -> Result<Json<LoadCartResponse>> {
    let backend = state.backend()?;
    let key = cart_key(query.user_id.as_deref(), query.session_id.as_deref())?;
    let cart_data = backend.carts().load(&key).await?;
    Ok(Json(LoadCartResponse { cart_data }))
}
