//! Admin notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use juliecraft_core::NotificationId;

use super::RepositoryError;
use crate::models::AdminNotification;

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Newest first, optionally only unread, at most `limit` rows.
    async fn list(
        &self,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<AdminNotification>, RepositoryError>;

    async fn count_unread(&self) -> Result<i64, RepositoryError>;

    /// Returns `false` when no such notification exists.
    async fn mark_read(&self, id: NotificationId) -> Result<bool, RepositoryError>;

    /// Returns how many notifications flipped from unread to read.
    async fn mark_all_read(&self) -> Result<u64, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i32,
    kind: String,
    title: String,
    message: Option<String>,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRow> for AdminNotification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: NotificationId::new(row.id),
            kind: row.kind,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

/// `PostgreSQL` notification repository.
#[derive(Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn list(
        &self,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<AdminNotification>, RepositoryError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r"
            SELECT id, kind, title, message, is_read, created_at
            FROM admin_notifications
            WHERE NOT ($1 AND is_read)
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            ",
        )
        .bind(unread_only)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AdminNotification::from).collect())
    }

    async fn count_unread(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM admin_notifications WHERE NOT is_read",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn mark_read(&self, id: NotificationId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE admin_notifications SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self) -> Result<u64, RepositoryError> {
        let result =
            sqlx::query("UPDATE admin_notifications SET is_read = TRUE WHERE NOT is_read")
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected())
    }
}
