//! Order repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use juliecraft_core::{OrderId, OrderItemId, OrderStatus, ProductId};

use super::{RepositoryError, parse_column};
use crate::models::{Order, OrderItem, TrackedOrder};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn count(&self) -> Result<i64, RepositoryError>;

    async fn count_by_status(&self, status: OrderStatus) -> Result<i64, RepositoryError>;

    /// `SUM(total)` over orders in `status`. `None` when nothing contributes,
    /// exactly as SQL reports it.
    async fn revenue(&self, status: OrderStatus) -> Result<Option<Decimal>, RepositoryError>;

    /// Look up an order and its line items by the public order number.
    async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<TrackedOrder>, RepositoryError>;

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    order_number: String,
    customer_email: Option<String>,
    status: String,
    total: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OrderId::new(row.id),
            order_number: row.order_number,
            customer_email: row.customer_email,
            status: parse_column("orders", "status", &row.status)?,
            total: row.total,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: row.product_id.map(ProductId::new),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price: row.unit_price,
        }
    }
}

const ORDER_COLUMNS: &str =
    "id, order_number, customer_email, status, total, created_at, updated_at";

/// `PostgreSQL` order repository.
#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE status = $1")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn revenue(&self, status: OrderStatus) -> Result<Option<Decimal>, RepositoryError> {
        let total =
            sqlx::query_scalar::<_, Option<Decimal>>("SELECT SUM(total) FROM orders WHERE status = $1")
                .bind(status.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(total)
    }

    async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<TrackedOrder>, RepositoryError> {
        let Some(row) = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_number = $1"
        ))
        .bind(order_number)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let order = Order::try_from(row)?;

        let items = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT id, order_id, product_id, product_name, quantity, unit_price
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(TrackedOrder {
            order,
            items: items.into_iter().map(OrderItem::from).collect(),
        }))
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}
