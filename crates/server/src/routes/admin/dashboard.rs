//! Dashboard statistics and badge counters.

use axum::{Json, extract::State};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::counters::CountersSnapshot;
use crate::services::dashboard::{self, DashboardStats};
use crate::state::AppState;

/// Store-wide totals for the dashboard header.
#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<DashboardStats>> {
    let stats = dashboard::collect(state.backend()?).await?;
    Ok(Json(stats))
}

/// Badge counters as last published by the refresh task.
#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn counters(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<CountersSnapshot>> {
    let snapshot = state.counters().current(state.backend()?).await?;
    Ok(Json(snapshot))
}
