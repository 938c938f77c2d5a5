//! Admin badge counters.
//!
//! Every open admin panel polls the same three numbers. One background task
//! computes them on a fixed interval and publishes the result through a
//! `watch` channel, so concurrent readers share a single query round.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::backend::Backend;
use crate::db::RepositoryError;
use crate::models::LOW_STOCK_THRESHOLD;
use juliecraft_core::OrderStatus;

/// One published set of counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountersSnapshot {
    pub low_stock_products: i64,
    pub pending_orders: i64,
    pub unread_notifications: i64,
    pub refreshed_at: DateTime<Utc>,
}

/// Holds the latest snapshot. Empty until the first successful refresh.
pub struct CountersHub {
    tx: watch::Sender<Option<CountersSnapshot>>,
}

impl Default for CountersHub {
    fn default() -> Self {
        Self::new()
    }
}

impl CountersHub {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn latest(&self) -> Option<CountersSnapshot> {
        self.tx.borrow().clone()
    }

    /// Subscribe to future snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<CountersSnapshot>> {
        self.tx.subscribe()
    }

    /// Compute a fresh snapshot and publish it.
    ///
    /// On error nothing is published and readers keep the previous value.
    ///
    /// # Errors
    ///
    /// Returns the first repository error hit.
    pub async fn refresh(&self, backend: &Backend) -> Result<CountersSnapshot, RepositoryError> {
        let (low_stock_products, pending_orders, unread_notifications) = tokio::try_join!(
            backend.products().count_low_stock(LOW_STOCK_THRESHOLD),
            backend.orders().count_by_status(OrderStatus::Pending),
            backend.notifications().count_unread(),
        )?;

        let snapshot = CountersSnapshot {
            low_stock_products,
            pending_orders,
            unread_notifications,
            refreshed_at: Utc::now(),
        };
        self.tx.send_replace(Some(snapshot.clone()));
        Ok(snapshot)
    }

    /// The latest snapshot, computing one first if nothing was published yet.
    ///
    /// # Errors
    ///
    /// Returns a repository error only when there is no snapshot to fall back on.
    pub async fn current(&self, backend: &Backend) -> Result<CountersSnapshot, RepositoryError> {
        match self.latest() {
            Some(snapshot) => Ok(snapshot),
            None => self.refresh(backend).await,
        }
    }
}

/// Spawn the refresh loop. The first tick fires immediately.
pub fn spawn_refresher(
    state: crate::AppState,
    backend: Backend,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match state.counters().refresh(&backend).await {
                Ok(snapshot) => tracing::debug!(
                    low_stock = snapshot.low_stock_products,
                    pending = snapshot.pending_orders,
                    unread = snapshot.unread_notifications,
                    "Admin counters refreshed"
                ),
                Err(e) => tracing::warn!(error = %e, "Admin counters refresh failed; keeping previous values"),
            }
        }
    })
}
