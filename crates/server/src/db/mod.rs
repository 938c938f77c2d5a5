//! Data access for the JulieCraft `PostgreSQL` database.
//!
//! # Tables
//!
//! - `profiles` - One row per identity-provider user, with role and admin flag
//! - `products` - Catalog with stock levels
//! - `orders` / `order_items` - Placed orders and their line items
//! - `user_carts` - Saved cart JSON keyed by user id or guest session id
//! - `admin_notifications` - Alerts shown in the admin panel
//!
//! Each table has a repository trait with a `Pg*` implementation here and an
//! in-memory implementation in [`memory`]. Handlers only see the traits,
//! through [`Backend`](crate::Backend).
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p juliecraft-cli -- migrate
//! ```

pub mod carts;
pub mod maintenance;
pub mod memory;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod profiles;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use carts::{CartRepository, PgCartRepository};
pub use maintenance::{MaintenanceRepository, PgMaintenanceRepository};
pub use memory::MemoryStore;
pub use notifications::{NotificationRepository, PgNotificationRepository};
pub use orders::{OrderRepository, PgOrderRepository};
pub use products::{PgProductRepository, ProductRepository};
pub use profiles::{PgProfileRepository, ProfileRepository};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Parse a TEXT enum column, reporting bad values as corruption.
pub(crate) fn parse_column<T>(table: &str, column: &str, value: &str) -> Result<T, RepositoryError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("{table}.{column}: {e}")))
}
