//! Profile repository.
//!
//! Profiles are created by the identity provider's signup hook; this service
//! only reads them and lets super admins change `role` and `status`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use juliecraft_core::{ProfileId, Role};

use super::{RepositoryError, parse_column};
use crate::models::{Profile, ProfileUpdate};

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Get a profile by id. `None` when the user has no profile row yet.
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError>;

    /// All profiles, newest first.
    async fn list(&self) -> Result<Vec<Profile>, RepositoryError>;

    /// Number of profiles holding `role`.
    async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError>;

    /// Apply a role/status change. `None` when the profile does not exist.
    async fn update_access(
        &self,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    full_name: Option<String>,
    is_admin: bool,
    role: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RepositoryError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        // The provider owns address validation; keep whatever it accepted
        Ok(Self {
            id: ProfileId::new(row.id),
            email: row.email,
            full_name: row.full_name,
            is_admin: row.is_admin,
            role: parse_column("profiles", "role", &row.role)?,
            status: parse_column("profiles", "status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PROFILE_COLUMNS: &str =
    "id, email, full_name, is_admin, role, status, created_at, updated_at";

/// `PostgreSQL` profile repository.
#[derive(Clone)]
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn get(&self, id: ProfileId) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    async fn list(&self) -> Result<Vec<Profile>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }

    async fn count_by_role(&self, role: Role) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM profiles WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_access(
        &self,
        id: ProfileId,
        update: ProfileUpdate,
    ) -> Result<Option<Profile>, RepositoryError> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            r"
            UPDATE profiles
            SET role = COALESCE($2, role),
                is_admin = COALESCE($3, is_admin),
                status = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PROFILE_COLUMNS}
            "
        ))
        .bind(id)
        .bind(update.role.map(|r| r.as_str()))
        .bind(update.role.map(|r| r.grants_admin_flag()))
        .bind(update.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        row.map(Profile::try_from).transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use juliecraft_core::AccountStatus;

    fn row(email: &str, role: &str) -> ProfileRow {
        ProfileRow {
            id: Uuid::new_v4(),
            email: email.to_string(),
            full_name: None,
            is_admin: true,
            role: role.to_string(),
            status: "active".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_provider_email_kept_verbatim() {
        let profile = Profile::try_from(row("ops@localhost", "admin")).unwrap();
        assert_eq!(profile.email, "ops@localhost");
        assert_eq!(profile.role, Role::Admin);
        assert_eq!(profile.status, AccountStatus::Active);
    }

    #[test]
    fn test_unknown_role_is_corruption() {
        assert!(matches!(
            Profile::try_from(row("julie@juliecraft.shop", "owner")),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
