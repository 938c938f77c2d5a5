//! Admin API. Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin)
//! or [`RequireSuperAdmin`](crate::middleware::RequireSuperAdmin).

pub mod dashboard;
pub mod inventory;
pub mod maintenance;
pub mod notifications;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use super::orders;
use crate::state::AppState;

/// Create the admin routes router (nested under `/api/admin`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/counters", get(dashboard::counters))
        .route("/migrate-stock", post(maintenance::migrate_stock))
        .route("/users", get(users::list))
        .route("/users/{id}", patch(users::update))
        .route("/inventory/low-stock", get(inventory::low_stock))
        .route("/products/{id}/stock", patch(inventory::set_stock))
        .route("/orders/{id}/status", patch(orders::update_status))
        .route("/notifications", get(notifications::list))
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/{id}/read", post(notifications::mark_read))
}
