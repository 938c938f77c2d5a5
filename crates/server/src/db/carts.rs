//! Saved carts.
//!
//! A row holds exactly one of `user_id` / `session_id` (enforced by a CHECK
//! constraint) and each key column has its own partial unique index, which
//! is what the `ON CONFLICT` clauses below target.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

use super::RepositoryError;
use crate::models::CartKey;

#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Upsert the cart for `key`. The last write wins.
    async fn save(&self, key: &CartKey, cart_data: &Value) -> Result<(), RepositoryError>;

    /// Load the cart for `key`, if one was ever saved.
    async fn load(&self, key: &CartKey) -> Result<Option<Value>, RepositoryError>;
}

/// `PostgreSQL` cart repository.
#[derive(Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn save(&self, key: &CartKey, cart_data: &Value) -> Result<(), RepositoryError> {
        let sql = match key {
            CartKey::User(_) => {
                r"
                INSERT INTO user_carts (user_id, cart_data, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (user_id) WHERE user_id IS NOT NULL
                DO UPDATE SET cart_data = EXCLUDED.cart_data, updated_at = NOW()
                "
            }
            CartKey::Session(_) => {
                r"
                INSERT INTO user_carts (session_id, cart_data, updated_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (session_id) WHERE session_id IS NOT NULL
                DO UPDATE SET cart_data = EXCLUDED.cart_data, updated_at = NOW()
                "
            }
        };

        sqlx::query(sql)
            .bind(key.value())
            .bind(sqlx::types::Json(cart_data))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn load(&self, key: &CartKey) -> Result<Option<Value>, RepositoryError> {
        let sql = match key {
            CartKey::User(_) => "SELECT cart_data FROM user_carts WHERE user_id = $1",
            CartKey::Session(_) => "SELECT cart_data FROM user_carts WHERE session_id = $1",
        };

        let row = sqlx::query_scalar::<_, sqlx::types::Json<Value>>(sql)
            .bind(key.value())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|json| json.0))
    }
}
