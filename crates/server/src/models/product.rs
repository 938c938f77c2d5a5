//! Catalog products and stock bookkeeping.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use juliecraft_core::ProductId;

/// Products with stock strictly below this count as low stock.
pub const LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock: i32,
    pub low_stock_threshold: i32,
    pub last_stock_update: Option<DateTime<Utc>>,
}

impl Product {
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

/// Input for seeding a product into the in-memory store.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
}

/// Totals reported after the stock-tracking migration runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub total_products: i64,
    pub total_stock: i64,
    pub low_stock_products: i64,
    pub out_of_stock_products: i64,
}

impl StockSummary {
    /// Fold a set of stock levels into a summary.
    #[must_use]
    pub fn from_levels(levels: impl IntoIterator<Item = i32>) -> Self {
        levels.into_iter().fold(Self::default(), |mut acc, stock| {
            acc.total_products += 1;
            acc.total_stock += i64::from(stock);
            if stock < LOW_STOCK_THRESHOLD {
                acc.low_stock_products += 1;
            }
            if stock == 0 {
                acc.out_of_stock_products += 1;
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_from_levels() {
        let summary = StockSummary::from_levels([0, 5, 9, 10, 11]);
        assert_eq!(summary.total_products, 5);
        assert_eq!(summary.total_stock, 35);
        assert_eq!(summary.low_stock_products, 3);
        assert_eq!(summary.out_of_stock_products, 1);
    }

    #[test]
    fn test_low_stock_boundary_excluded() {
        let product = |stock| Product {
            id: ProductId::new(1),
            name: "Bamboo hook set".to_string(),
            price: Decimal::new(1500, 2),
            stock,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            last_stock_update: None,
        };
        assert!(product(0).is_low_stock());
        assert!(product(9).is_low_stock());
        assert!(!product(10).is_low_stock());
        assert!(!product(11).is_low_stock());
    }
}
