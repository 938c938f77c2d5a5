//! Staff access management.
//!
//! Accounts are created through the identity provider's signup flow; these
//! commands only change the role on an existing profile. Setting a role
//! also sets `is_admin`, the same way the admin API does.
//!
//! # Environment Variables
//!
//! - `JULIECRAFT_DATABASE_URL` - `PostgreSQL` connection string

use juliecraft_core::{Email, Role};
use thiserror::Error;
use uuid::Uuid;

use super::{ConnectError, connect};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] ConnectError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid role: {0}. Valid roles: admin, manager, super_admin")]
    InvalidRole(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("No profile found for {0}; the user must sign up first")]
    ProfileNotFound(String),
}

fn parse_email(email: &str) -> Result<Email, AdminError> {
    Email::parse(email).map_err(|e| AdminError::InvalidEmail(format!("{email}: {e}")))
}

fn parse_staff_role(role: &str) -> Result<Role, AdminError> {
    match role.parse::<Role>() {
        Ok(role) if role.grants_admin_flag() => Ok(role),
        _ => Err(AdminError::InvalidRole(role.to_owned())),
    }
}

async fn set_role(email: &Email, role: Role) -> Result<Uuid, AdminError> {
    let pool = connect().await?;

    sqlx::query_scalar::<_, Uuid>(
        r"
        UPDATE profiles
        SET role = $2, is_admin = $3, updated_at = NOW()
        WHERE LOWER(email) = $1
        RETURNING id
        ",
    )
    .bind(email.as_str())
    .bind(role.as_str())
    .bind(role.grants_admin_flag())
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AdminError::ProfileNotFound(email.to_string()))
}

/// Give an existing profile an admin role.
pub async fn grant(email: &str, role: &str) -> Result<(), AdminError> {
    let role = parse_staff_role(role)?;
    let email = parse_email(email)?;

    let id = set_role(&email, role).await?;
    tracing::info!("Granted {} to {} (profile {})", role, email, id);
    Ok(())
}

/// Demote a profile to customer.
pub async fn revoke(email: &str) -> Result<(), AdminError> {
    let email = parse_email(email)?;

    let id = set_role(&email, Role::Customer).await?;
    tracing::info!("Revoked admin access from {} (profile {})", email, id);
    Ok(())
}

/// Log every profile with admin access.
pub async fn list() -> Result<(), AdminError> {
    let pool = connect().await?;

    let rows = sqlx::query_as::<_, (String, String, String)>(
        "SELECT email, role, status FROM profiles WHERE is_admin ORDER BY email",
    )
    .fetch_all(&pool)
    .await?;

    if rows.is_empty() {
        tracing::info!("No profiles have admin access");
    }
    for (email, role, status) in rows {
        tracing::info!("{email}  {role}  {status}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_staff_roles_only() {
        assert_eq!(parse_staff_role("super_admin").ok(), Some(Role::SuperAdmin));
        assert_eq!(parse_staff_role("manager").ok(), Some(Role::Manager));
        assert!(matches!(
            parse_staff_role("customer"),
            Err(AdminError::InvalidRole(_))
        ));
        assert!(parse_staff_role("viewer").is_err());
    }

    #[test]
    fn test_email_validated() {
        assert!(matches!(
            parse_email("not-an-email"),
            Err(AdminError::InvalidEmail(_))
        ));
        assert_eq!(
            parse_email("Julie@JulieCraft.shop").unwrap().as_str(),
            "julie@juliecraft.shop"
        );
    }
}
