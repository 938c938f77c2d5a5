//! Admin panel notifications.

use chrono::{DateTime, Utc};
use serde::Serialize;

use juliecraft_core::NotificationId;

/// Page size of the notification feed when the caller names none.
pub const DEFAULT_NOTIFICATION_LIMIT: i64 = 100;

/// Largest page the notification feed serves.
pub const MAX_NOTIFICATION_LIMIT: i64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    pub id: NotificationId,
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for seeding a notification into the in-memory store.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
}
