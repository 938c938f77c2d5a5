//! Subcommand implementations.

pub mod admin;
pub mod migrate;

use secrecy::SecretString;
use sqlx::PgPool;

/// Errors shared by every command that needs the database.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("Missing environment variable: JULIECRAFT_DATABASE_URL (or DATABASE_URL)")]
    MissingDatabaseUrl,

    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect using `JULIECRAFT_DATABASE_URL`, falling back to `DATABASE_URL`.
pub async fn connect() -> Result<PgPool, ConnectError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("JULIECRAFT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| ConnectError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    let pool = juliecraft_server::db::create_pool(&SecretString::from(database_url)).await?;
    Ok(pool)
}
