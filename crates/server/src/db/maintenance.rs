//! Connectivity checks and the stock-tracking schema migration.

use async_trait::async_trait;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::{LOW_STOCK_THRESHOLD, StockSummary};

/// Statements run, in order, by [`MaintenanceRepository::migrate_stock`].
///
/// Every statement is idempotent so the endpoint can be called repeatedly.
/// `version` is added for schema parity but nothing reads it.
pub const STOCK_MIGRATION: &[&str] = &[
    "ALTER TABLE products ADD COLUMN IF NOT EXISTS version INTEGER NOT NULL DEFAULT 0",
    "ALTER TABLE products ADD COLUMN IF NOT EXISTS low_stock_threshold INTEGER NOT NULL DEFAULT 10",
    "ALTER TABLE products ADD COLUMN IF NOT EXISTS last_stock_update TIMESTAMPTZ",
    "UPDATE products SET stock = 0 WHERE stock IS NULL",
    "UPDATE products SET last_stock_update = COALESCE(updated_at, NOW()) WHERE last_stock_update IS NULL",
    "CREATE INDEX IF NOT EXISTS idx_products_stock ON products (stock)",
];

#[async_trait]
pub trait MaintenanceRepository: Send + Sync {
    /// Round-trip to the store.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// Apply [`STOCK_MIGRATION`] and summarize the resulting stock levels.
    async fn migrate_stock(&self) -> Result<StockSummary, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct SummaryRow {
    total_products: i64,
    total_stock: i64,
    low_stock_products: i64,
    out_of_stock_products: i64,
}

/// `PostgreSQL` maintenance repository.
#[derive(Clone)]
pub struct PgMaintenanceRepository {
    pool: PgPool,
}

impl PgMaintenanceRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRepository for PgMaintenanceRepository {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn migrate_stock(&self) -> Result<StockSummary, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        for statement in STOCK_MIGRATION {
            tracing::debug!(statement, "Applying stock migration statement");
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        let row = sqlx::query_as::<_, SummaryRow>(
            r"
            SELECT COUNT(*) AS total_products,
                   COALESCE(SUM(stock), 0)::BIGINT AS total_stock,
                   COUNT(*) FILTER (WHERE stock < $1) AS low_stock_products,
                   COUNT(*) FILTER (WHERE stock = 0) AS out_of_stock_products
            FROM products
            ",
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(StockSummary {
            total_products: row.total_products,
            total_stock: row.total_stock,
            low_stock_products: row.low_stock_products,
            out_of_stock_products: row.out_of_stock_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIGRATION_FILE: &str = include_str!("../../migrations/20261018000005_stock_tracking.sql");

    #[test]
    fn test_version_column_defaults_to_zero() {
        let version = STOCK_MIGRATION
            .iter()
            .find(|s| s.contains(" version "))
            .copied();
        assert_eq!(
            version,
            Some("ALTER TABLE products ADD COLUMN IF NOT EXISTS version INTEGER NOT NULL DEFAULT 0")
        );
    }

    #[test]
    fn test_statements_are_rerunnable() {
        for statement in STOCK_MIGRATION {
            assert!(
                statement.contains("IF NOT EXISTS") || statement.contains("IS NULL"),
                "not idempotent: {statement}"
            );
        }
    }

    #[test]
    fn test_migration_file_matches_endpoint() {
        for statement in STOCK_MIGRATION {
            assert!(
                MIGRATION_FILE.contains(&format!("{statement};")),
                "missing from migration file: {statement}"
            );
        }
    }
}
