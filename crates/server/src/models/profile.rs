//! Profile rows and the views handed back to clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use juliecraft_core::{AccountStatus, Email, ProfileId, Role};

/// A row in `profiles`, keyed by the identity provider's user id.
///
/// `is_admin` gates the admin panel; `role` picks the level once inside.
/// `email` is stored as the identity provider accepted it, which can be
/// looser than [`Email::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub email: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
    pub role: Role,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// A fresh active customer profile.
    #[must_use]
    pub fn customer(id: ProfileId, email: Email) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: email.into_inner(),
            full_name: None,
            is_admin: false,
            role: Role::Customer,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Assign a role, keeping `is_admin` in step with it.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self.is_admin = role.grants_admin_flag();
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }
}

/// Super-admin edit of another account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    pub role: Option<Role>,
    pub status: Option<AccountStatus>,
}

impl ProfileUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.role.is_none() && self.status.is_none()
    }

    /// Apply to an in-memory profile the same way the SQL update does.
    pub fn apply(&self, profile: &mut Profile) {
        if let Some(role) = self.role {
            profile.role = role;
            profile.is_admin = role.grants_admin_flag();
        }
        if let Some(status) = self.status {
            profile.status = status;
        }
        profile.updated_at = Utc::now();
    }
}

/// The `user` object returned by login and `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: ProfileId,
    pub email: Option<String>,
    pub role: Role,
    pub is_admin: bool,
}

impl UserView {
    /// Build the view from the profile row, or treat the caller as a plain
    /// customer when no row exists yet.
    #[must_use]
    pub fn new(id: ProfileId, email: Option<Email>, profile: Option<&Profile>) -> Self {
        match profile {
            Some(profile) => Self {
                id,
                email: Some(profile.email.clone()),
                role: profile.role,
                is_admin: profile.is_admin,
            },
            None => Self {
                id,
                email: email.map(Email::into_inner),
                role: Role::Customer,
                is_admin: false,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile::customer(ProfileId::random(), Email::parse("julie@juliecraft.shop").unwrap())
    }

    #[test]
    fn test_role_update_syncs_admin_flag() {
        let mut p = profile();
        ProfileUpdate {
            role: Some(Role::Manager),
            status: None,
        }
        .apply(&mut p);
        assert!(p.is_admin);
        assert_eq!(p.role, Role::Manager);

        ProfileUpdate {
            role: Some(Role::Customer),
            status: None,
        }
        .apply(&mut p);
        assert!(!p.is_admin);
    }

    #[test]
    fn test_status_update_leaves_role() {
        let mut p = profile().with_role(Role::Admin);
        ProfileUpdate {
            role: None,
            status: Some(AccountStatus::Inactive),
        }
        .apply(&mut p);
        assert!(p.is_admin);
        assert_eq!(p.status, AccountStatus::Inactive);
    }

    #[test]
    fn test_user_view_without_profile_is_customer() {
        let id = ProfileId::random();
        let view = UserView::new(id, None, None);
        assert_eq!(view.role, Role::Customer);
        assert!(!view.is_admin);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["isAdmin"], false);
        assert_eq!(json["role"], "customer");
    }
}
