//! Request extractors and middleware.

pub mod auth;
pub mod request_id;

pub use auth::{AdminCaller, Authenticated, Caller, RequireAdmin, RequireSuperAdmin};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
