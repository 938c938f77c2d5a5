//! The set of collaborators every data endpoint talks to.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::{
    CartRepository, MaintenanceRepository, MemoryStore, NotificationRepository,
    OrderRepository, PgCartRepository, PgMaintenanceRepository, PgNotificationRepository,
    PgOrderRepository, PgProductRepository, PgProfileRepository, ProductRepository,
    ProfileRepository,
};
use crate::identity::IdentityProvider;

/// Identity provider plus one repository per table, as trait objects.
///
/// Cheap to clone; handlers and the counters task each hold a copy.
#[derive(Clone)]
pub struct Backend {
    identity: Arc<dyn IdentityProvider>,
    profiles: Arc<dyn ProfileRepository>,
    products: Arc<dyn ProductRepository>,
    orders: Arc<dyn OrderRepository>,
    carts: Arc<dyn CartRepository>,
    notifications: Arc<dyn NotificationRepository>,
    maintenance: Arc<dyn MaintenanceRepository>,
}

impl Backend {
    /// Repositories over a `PostgreSQL` pool.
    #[must_use]
    pub fn postgres(pool: PgPool, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            profiles: Arc::new(PgProfileRepository::new(pool.clone())),
            products: Arc::new(PgProductRepository::new(pool.clone())),
            orders: Arc::new(PgOrderRepository::new(pool.clone())),
            carts: Arc::new(PgCartRepository::new(pool.clone())),
            notifications: Arc::new(PgNotificationRepository::new(pool.clone())),
            maintenance: Arc::new(PgMaintenanceRepository::new(pool)),
        }
    }

    /// Every repository served by one shared [`MemoryStore`].
    #[must_use]
    pub fn in_memory(store: Arc<MemoryStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            profiles: store.clone(),
            products: store.clone(),
            orders: store.clone(),
            carts: store.clone(),
            notifications: store.clone(),
            maintenance: store,
        }
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn profiles(&self) -> &dyn ProfileRepository {
        self.profiles.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductRepository {
        self.products.as_ref()
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderRepository {
        self.orders.as_ref()
    }

    #[must_use]
    pub fn carts(&self) -> &dyn CartRepository {
        self.carts.as_ref()
    }

    #[must_use]
    pub fn notifications(&self) -> &dyn NotificationRepository {
        self.notifications.as_ref()
    }

    #[must_use]
    pub fn maintenance(&self) -> &dyn MaintenanceRepository {
        self.maintenance.as_ref()
    }
}
