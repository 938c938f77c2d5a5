//! Admin notification feed.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juliecraft_core::NotificationId;

use crate::error::{AppError, Result};
use crate::extract::{ApiPath, ApiQuery};
use crate::middleware::RequireAdmin;
use crate::models::{AdminNotification, DEFAULT_NOTIFICATION_LIMIT, MAX_NOTIFICATION_LIMIT};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct MarkAllReadResponse {
    pub updated: u64,
}

#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Vec<AdminNotification>>> {
    let limit = query.limit.unwrap_or(DEFAULT_NOTIFICATION_LIMIT);
    if !(1..=MAX_NOTIFICATION_LIMIT).contains(&limit) {
        return Err(AppError::bad_request(format!(
            "limit must be between 1 and {MAX_NOTIFICATION_LIMIT}"
        )));
    }

    let notifications = state
        .backend()?
        .notifications()
        .list(query.unread_only, limit)
        .await?;
    Ok(Json(notifications))
}

#[instrument(skip_all, fields(admin_id = %admin.caller.id, notification_id = %id))]
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ApiPath(id): ApiPath<NotificationId>,
) -> Result<Json<MarkReadResponse>> {
    if !state.backend()?.notifications().mark_read(id).await? {
        return Err(AppError::NotFound("Notification not found".to_string()));
    }
    Ok(Json(MarkReadResponse { success: true }))
}

#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<MarkAllReadResponse>> {
    let updated = state.backend()?.notifications().mark_all_read().await?;
    Ok(Json(MarkAllReadResponse { updated }))
}
