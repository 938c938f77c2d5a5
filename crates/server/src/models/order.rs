//! Orders and their line items.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use juliecraft_core::{OrderId, OrderItemId, OrderStatus, ProductId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    /// Nullable in the schema; excluded from revenue when absent.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
}

/// Public order-tracking payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Input for seeding an order into the in-memory store.
#[derive(Debug, Clone, Default)]
pub struct NewOrder {
    pub order_number: String,
    pub customer_email: Option<String>,
    pub status: OrderStatus,
    pub total: Option<Decimal>,
    pub items: Vec<NewOrderItem>,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
}
