//! JulieCraft Core - Shared types library.
//!
//! This crate provides the domain types used across the JulieCraft workspace:
//! - `server` - Storefront and admin JSON API
//! - `cli` - Command-line tools for migrations and admin grants
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. Database encoding is available behind the `postgres` feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, validated emails, roles and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
