//! Admin dashboard statistics.

use rust_decimal::Decimal;
use serde::Serialize;

use juliecraft_core::{OrderStatus, Role};

use crate::backend::Backend;
use crate::db::RepositoryError;
use crate::models::LOW_STOCK_THRESHOLD;

/// The flat object behind `GET /api/admin/dashboard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_customers: i64,
    /// Completed-order revenue; zero when nothing has completed.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
    pub pending_orders: i64,
    pub low_stock_products: i64,
}

/// Run the six dashboard queries concurrently and merge them.
///
/// # Errors
///
/// Fails as soon as any query fails; there is no partial result.
pub async fn collect(backend: &Backend) -> Result<DashboardStats, RepositoryError> {
    let (
        total_products,
        total_orders,
        total_customers,
        revenue,
        pending_orders,
        low_stock_products,
    ) = tokio::try_join!(
        backend.products().count(),
        backend.orders().count(),
        backend.profiles().count_by_role(Role::Customer),
        backend.orders().revenue(OrderStatus::Completed),
        backend.orders().count_by_status(OrderStatus::Pending),
        backend.products().count_low_stock(LOW_STOCK_THRESHOLD),
    )?;

    Ok(DashboardStats {
        total_products,
        total_orders,
        total_customers,
        total_revenue: revenue.unwrap_or_default(),
        pending_orders,
        low_stock_products,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::db::MemoryStore;
    use crate::identity::MemoryIdentityProvider;
    use crate::models::{NewOrder, NewProduct, Profile};
    use juliecraft_core::{Email, ProfileId};

    fn backend(store: &Arc<MemoryStore>) -> Backend {
        Backend::in_memory(store.clone(), Arc::new(MemoryIdentityProvider::new()))
    }

    #[tokio::test]
    async fn test_empty_store_reports_zeroes() {
        let store = Arc::new(MemoryStore::new());
        let stats = collect(&backend(&store)).await.unwrap();
        assert_eq!(stats.total_revenue, Decimal::ZERO);

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["totalRevenue"], serde_json::json!(0.0));
        assert_eq!(json["lowStockProducts"], 0);
    }

    #[tokio::test]
    async fn test_counts() {
        let store = Arc::new(MemoryStore::new());
        for stock in [5, 9, 10, 11] {
            store
                .add_product(NewProduct {
                    name: format!("Yarn bundle {stock}"),
                    price: Decimal::new(1200, 2),
                    stock,
                })
                .await;
        }
        for (i, status) in [OrderStatus::Pending, OrderStatus::Completed, OrderStatus::Pending]
            .into_iter()
            .enumerate()
        {
            store
                .add_order(NewOrder {
                    order_number: format!("JC-{i}"),
                    status,
                    total: Some(Decimal::new(4250, 2)),
                    ..NewOrder::default()
                })
                .await;
        }
        for (i, role) in [Role::Customer, Role::Customer, Role::Admin].into_iter().enumerate() {
            let email = Email::parse(&format!("person{i}@juliecraft.shop")).unwrap();
            store
                .put_profile(Profile::customer(ProfileId::random(), email).with_role(role))
                .await;
        }

        let stats = collect(&backend(&store)).await.unwrap();
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.low_stock_products, 2);
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.total_customers, 2);
        assert_eq!(stats.total_revenue, Decimal::new(4250, 2));
    }

    #[tokio::test]
    async fn test_any_failure_fails_all() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        assert!(collect(&backend(&store)).await.is_err());
    }
}
