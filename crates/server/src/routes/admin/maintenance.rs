//! One-shot schema maintenance.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::StockSummary;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MigrateStockResponse {
    pub success: bool,
    pub message: &'static str,
    pub summary: StockSummary,
}

/// Add the stock-tracking columns and report current stock totals.
///
/// Safe to call more than once.
#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn migrate_stock(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<MigrateStockResponse>> {
    let summary = state.backend()?.maintenance().migrate_stock().await?;

    tracing::info!(
        total_products = summary.total_products,
        low_stock = summary.low_stock_products,
        out_of_stock = summary.out_of_stock_products,
        "Stock migration applied"
    );

    Ok(Json(MigrateStockResponse {
        success: true,
        message: "Stock tracking migration completed",
        summary,
    }))
}
