//! Admin authorization.
//!
//! One predicate decides admin access everywhere. `is_admin` is the gate and
//! `role` only picks the level inside it, so the two fields can never give
//! conflicting answers at different call sites.

use std::fmt;

use juliecraft_core::{AccountStatus, Role};

use crate::models::Profile;

/// How much admin access a caller has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AdminLevel {
    Admin,
    SuperAdmin,
}

/// Why admin access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// The caller has no profile row.
    ProfileMissing,
    /// The profile exists but is not flagged as admin.
    NotAdmin,
    /// An admin profile that has been deactivated.
    Deactivated,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ProfileMissing => "Profile not found",
            Self::NotAdmin => "Admin access required",
            Self::Deactivated => "Account is deactivated",
        })
    }
}

/// Outcome of [`check_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Authorized(AdminLevel),
    Denied(DenialReason),
}

/// Decide whether a profile may use the admin API.
///
/// Checks run in order: the row must exist, carry `is_admin`, and be active.
/// Past that, `role = super_admin` grants [`AdminLevel::SuperAdmin`] and any
/// other role grants [`AdminLevel::Admin`].
#[must_use]
pub fn check_admin(profile: Option<&Profile>) -> Capability {
    let Some(profile) = profile else {
        return Capability::Denied(DenialReason::ProfileMissing);
    };
    if !profile.is_admin {
        return Capability::Denied(DenialReason::NotAdmin);
    }
    if profile.status == AccountStatus::Inactive {
        return Capability::Denied(DenialReason::Deactivated);
    }
    if profile.role == Role::SuperAdmin {
        Capability::Authorized(AdminLevel::SuperAdmin)
    } else {
        Capability::Authorized(AdminLevel::Admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use juliecraft_core::{Email, ProfileId};

    fn profile(role: Role) -> Profile {
        Profile::customer(ProfileId::random(), Email::parse("staff@juliecraft.shop").unwrap())
            .with_role(role)
    }

    #[test]
    fn test_missing_profile_denied() {
        assert_eq!(
            check_admin(None),
            Capability::Denied(DenialReason::ProfileMissing)
        );
    }

    #[test]
    fn test_customer_denied() {
        assert_eq!(
            check_admin(Some(&profile(Role::Customer))),
            Capability::Denied(DenialReason::NotAdmin)
        );
    }

    #[test]
    fn test_flag_is_the_gate() {
        // A stale row with an admin role but no flag stays out
        let mut p = profile(Role::Admin);
        p.is_admin = false;
        assert_eq!(
            check_admin(Some(&p)),
            Capability::Denied(DenialReason::NotAdmin)
        );

        // A flagged customer row gets in at the base level
        let mut p = profile(Role::Customer);
        p.is_admin = true;
        assert_eq!(
            check_admin(Some(&p)),
            Capability::Authorized(AdminLevel::Admin)
        );
    }

    #[test]
    fn test_deactivated_admin_denied() {
        let p = profile(Role::SuperAdmin).with_status(AccountStatus::Inactive);
        assert_eq!(
            check_admin(Some(&p)),
            Capability::Denied(DenialReason::Deactivated)
        );
    }

    #[test]
    fn test_levels() {
        assert_eq!(
            check_admin(Some(&profile(Role::Admin))),
            Capability::Authorized(AdminLevel::Admin)
        );
        assert_eq!(
            check_admin(Some(&profile(Role::Manager))),
            Capability::Authorized(AdminLevel::Admin)
        );
        assert_eq!(
            check_admin(Some(&profile(Role::SuperAdmin))),
            Capability::Authorized(AdminLevel::SuperAdmin)
        );
        assert!(AdminLevel::SuperAdmin > AdminLevel::Admin);
    }
}
