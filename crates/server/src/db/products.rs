//! Product repository (catalog counts and stock levels).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use juliecraft_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn count(&self) -> Result<i64, RepositoryError>;

    /// Products with stock strictly below `threshold`.
    async fn count_low_stock(&self, threshold: i32) -> Result<i64, RepositoryError>;

    /// Low-stock products, lowest stock first.
    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<Product>, RepositoryError>;

    /// Overwrite a product's stock level. `None` when the product does not exist.
    async fn set_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<Option<Product>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    price: Decimal,
    stock: i32,
    low_stock_threshold: i32,
    last_stock_update: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            price: row.price,
            stock: row.stock,
            low_stock_threshold: row.low_stock_threshold,
            last_stock_update: row.last_stock_update,
        }
    }
}

// `stock` is nullable in older databases until the stock migration backfills it
const PRODUCT_COLUMNS: &str = "id, name, price, COALESCE(stock, 0) AS stock, \
     low_stock_threshold, last_stock_update";

// Same NULL-as-zero reading as PRODUCT_COLUMNS, so a listed 0 is also counted
const LOW_STOCK_FILTER: &str = "COALESCE(stock, 0) < $1";

/// `PostgreSQL` product repository.
#[derive(Clone)]
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_low_stock(&self, threshold: i32) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM products WHERE {LOW_STOCK_FILTER}"
        ))
        .bind(threshold)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE {LOW_STOCK_FILTER} \
             ORDER BY COALESCE(stock, 0), id"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn set_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            UPDATE products
            SET stock = $2, last_stock_update = NOW(), updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_stock_read_as_zero_everywhere() {
        assert!(PRODUCT_COLUMNS.contains("COALESCE(stock, 0) AS stock"));
        assert!(LOW_STOCK_FILTER.starts_with("COALESCE(stock, 0)"));
    }
}
