//! Role and status enums.
//!
//! All of these are stored as plain `TEXT` columns holding the snake_case
//! names, so each enum round-trips through [`as_str`](Role::as_str) and
//! [`FromStr`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A string did not name a known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// Role string on a profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Storefront shopper.
    #[default]
    Customer,
    /// Store staff with dashboard access.
    Admin,
    /// Can also manage other staff accounts.
    SuperAdmin,
    /// Store manager.
    Manager,
}

impl Role {
    /// Database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
            Self::Manager => "manager",
        }
    }

    /// Whether accounts with this role get the admin flag when the role is assigned.
    #[must_use]
    pub const fn grants_admin_flag(&self) -> bool {
        !matches!(self, Self::Customer)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            "manager" => Ok(Self::Manager),
            _ => Err(ParseEnumError::new("role", s)),
        }
    }
}

/// Profile lifecycle. Profiles are never deleted, only deactivated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseEnumError::new("account status", s)),
        }
    }
}

/// Order fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseEnumError::new("order status", s)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [Role::Customer, Role::Admin, Role::SuperAdmin, Role::Manager] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_role_admin_flag() {
        assert!(!Role::Customer.grants_admin_flag());
        assert!(Role::Admin.grants_admin_flag());
        assert!(Role::SuperAdmin.grants_admin_flag());
        assert!(Role::Manager.grants_admin_flag());
    }

    #[test]
    fn test_unknown_values_rejected() {
        let err = "owner".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "invalid role: owner");
        assert!("archived".parse::<AccountStatus>().is_err());
        assert!("refunded".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_status_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }
}
