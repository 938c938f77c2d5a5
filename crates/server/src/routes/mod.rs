//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! # Auth
//! POST  /api/auth/login                        - Password sign-in, returns a bearer token
//! POST  /api/auth/logout                       - Revoke the bearer token (always 200)
//! GET   /api/auth/me                           - Caller's user view
//!
//! # Storefront
//! POST  /api/cart/save                         - Upsert a saved cart
//! GET   /api/cart/load                         - Load a saved cart
//! GET   /api/orders/track/{order_number}       - Public order tracking
//!
//! # Admin (bearer token + admin profile)
//! GET   /api/admin/dashboard                   - Store-wide statistics
//! GET   /api/admin/counters                    - Badge counters from the refresh task
//! POST  /api/admin/migrate-stock               - Add stock-tracking columns
//! GET   /api/admin/users                       - All profiles
//! PATCH /api/admin/users/{id}                  - Change role/status (super admin)
//! GET   /api/admin/inventory/low-stock         - Products below the threshold
//! PATCH /api/admin/products/{id}/stock         - Set a stock level
//! PATCH /api/admin/orders/{id}/status          - Move an order along
//! GET   /api/admin/notifications               - Notification feed
//! POST  /api/admin/notifications/read-all      - Mark everything read
//! POST  /api/admin/notifications/{id}/read     - Mark one read
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/save", post(cart::save))
        .route("/load", get(cart::load))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/cart", cart_routes())
        .route("/api/orders/track/{order_number}", get(orders::track))
        .nest("/api/admin", admin::routes())
}
