//! In-memory store implementing every repository trait.
//!
//! Backs the integration tests and local runs without a database. Semantics
//! follow the SQL in the `Pg*` repositories, including `SUM` returning
//! nothing when no row contributes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::RwLock;

use juliecraft_core::{
    NotificationId, OrderId, OrderItemId, OrderStatus, ProductId, ProfileId, Role,
};

use super::{
    CartRepository, MaintenanceRepository, NotificationRepository, OrderRepository,
    ProductRepository, ProfileRepository, RepositoryError,
};
use crate::models::{
    AdminNotification, CartKey, LOW_STOCK_THRESHOLD, NewNotification, NewOrder, NewProduct,
    Order, OrderItem, Product, Profile, ProfileUpdate, StockSummary, TrackedOrder,
};

#[derive(Default)]
struct Tables {
    profiles: HashMap<ProfileId, Profile>,
    products: Vec<Product>,
    orders: Vec<Order>,
    order_items: Vec<OrderItem>,
    carts: HashMap<CartKey, Value>,
    notifications: Vec<AdminNotification>,
}

/// Shared in-memory database.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    next_id: AtomicI32,
    offline: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent query fail, as if the database went away.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), RepositoryError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable(
                "in-memory store is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn next_id(&self) -> i32 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Insert or replace a profile row.
    pub async fn put_profile(&self, profile: Profile) {
        self.tables
            .write()
            .await
            .profiles
            .insert(profile.id, profile);
    }

    pub async fn add_product(&self, new: NewProduct) -> Product {
        let product = Product {
            id: ProductId::new(self.next_id()),
            name: new.name,
            price: new.price,
            stock: new.stock,
            low_stock_threshold: LOW_STOCK_THRESHOLD,
            last_stock_update: Some(Utc::now()),
        };
        self.tables.write().await.products.push(product.clone());
        product
    }

    pub async fn add_order(&self, new: NewOrder) -> Order {
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(self.next_id()),
            order_number: new.order_number,
            customer_email: new.customer_email,
            status: new.status,
            total: new.total,
            created_at: now,
            updated_at: now,
        };
        let items: Vec<OrderItem> = new
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: OrderItemId::new(self.next_id()),
                order_id: order.id,
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        let mut tables = self.tables.write().await;
        tables.orders.push(order.clone());
        tables.order_items.extend(items);
        order
    }

    pub async fn add_notification(&self, new: NewNotification) -> AdminNotification {
        let notification = AdminNotification {
            id: NotificationId::new(self.next_id()),
            kind: new.kind,
            title: new.title,
            message: new.message,
            is_read: false,
            created_at: Utc::now(),
        };
        self.tables
            .write()
            .await
            .notifications
            .push(notification.clone());
        notification
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        self.check_online()?;
        Ok(self.tables.read().await.profiles.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        self.check_online()?;
        let mut profiles: Vec<Profile> =
            self.tables.read().await.profiles.values().cloned().collect();
        profiles.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(profiles)
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(count(tables.profiles.values().filter(|p| p.role == role)))
    }

    async fn update_access(
        &self,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.profiles.get_mut(&id).map(|profile| {
            update.apply(profile);
            profile.clone()
        }))
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn count(&self) -> Result<i64, RepositoryError> {
        self.check_online()?;
        Ok(count(self.tables.read().await.products.iter()))
    }

    async fn count_low_stock(&self, threshold: i32) -> Result<i64, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(count(tables.products.iter().filter(|p| p.stock < threshold)))
    }

    async fn list_low_stock(&self, threshold: i32) -> Result<Vec<Product>, RepositoryError> {
        self.check_online()?;
        let mut low: Vec<Product> = self
            .tables
            .read()
            .await
            .products
            .iter()
            .filter(|p| p.stock < threshold)
            .cloned()
            .collect();
        low.sort_by_key(|p| (p.stock, p.id));
        Ok(low)
    }

    async fn set_stock(
        &self,
        id: ProductId,
        stock: i32,
    ) -> Result<Option<Product>, RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .map(|product| {
                product.stock = stock;
                product.last_stock_update = Some(Utc::now());
                product.clone()
            }))
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn count(&self) -> Result<i64, RepositoryError> {
        self.check_online()?;
        Ok(count(self.tables.read().await.orders.iter()))
    }

    async fn count_by_status(&self, status: OrderStatus) -> Result<i64, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(count(tables.orders.iter().filter(|o| o.status == status)))
    }

    async fn revenue(&self, status: OrderStatus) -> Result<Option<Decimal>, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(tables
            .orders
            .iter()
            .filter(|o| o.status == status)
            .filter_map(|o| o.total)
            .reduce(|acc, total| acc + total))
    }

    async fn find_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<TrackedOrder>, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let Some(order) = tables
            .orders
            .iter()
            .find(|o| o.order_number == order_number)
        else {
            return Ok(None);
        };

        let items = tables
            .order_items
            .iter()
            .filter(|item| item.order_id == order.id)
            .cloned()
            .collect();
        Ok(Some(TrackedOrder {
            order: order.clone(),
            items,
        }))
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Option<Order>, RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        Ok(tables.orders.iter_mut().find(|o| o.id == id).map(|order| {
            order.status = status;
            order.updated_at = Utc::now();
            order.clone()
        }))
    }
}

#[async_trait]
impl CartRepository for MemoryStore {
    async fn save(&self, key: &CartKey, cart_data: &Value) -> Result<(), RepositoryError> {
        self.check_online()?;
        self.tables
            .write()
            .await
            .carts
            .insert(key.clone(), cart_data.clone());
        Ok(())
    }

    async fn load(&self, key: &CartKey) -> Result<Option<Value>, RepositoryError> {
        self.check_online()?;
        Ok(self.tables.read().await.carts.get(key).cloned())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn list(
        &self,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<AdminNotification>, RepositoryError> {
        self.check_online()?;
        let mut notifications: Vec<AdminNotification> = self
            .tables
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| !(unread_only && n.is_read))
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        notifications.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(notifications)
    }

    async fn count_unread(&self) -> Result<i64, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(count(tables.notifications.iter().filter(|n| !n.is_read)))
    }

    async fn mark_read(&self, id: NotificationId) -> Result<bool, RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        match tables.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self) -> Result<u64, RepositoryError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let mut updated = 0;
        for notification in tables.notifications.iter_mut().filter(|n| !n.is_read) {
            notification.is_read = true;
            updated += 1;
        }
        Ok(updated)
    }
}

#[async_trait]
impl MaintenanceRepository for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_online()
    }

    async fn migrate_stock(&self) -> Result<StockSummary, RepositoryError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(StockSummary::from_levels(
            tables.products.iter().map(|p| p.stock),
        ))
    }
}

fn count<T>(iter: impl Iterator<Item = T>) -> i64 {
    i64::try_from(iter.count()).unwrap_or(i64::MAX)
}
