//! Business logic that sits between handlers and repositories.

pub mod authz;
pub mod counters;
pub mod dashboard;

pub use authz::{AdminLevel, Capability, DenialReason, check_admin};
pub use counters::{CountersHub, CountersSnapshot};
pub use dashboard::DashboardStats;
