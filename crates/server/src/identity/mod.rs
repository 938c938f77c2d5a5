//! Caller identity.
//!
//! Token validity is entirely the identity provider's call: this service
//! keeps no sessions, signs nothing and holds no revocation list. It pulls
//! the bearer token off the request and asks the provider who it belongs to.
//!
//! Two providers implement [`IdentityProvider`]:
//!
//! - [`RemoteIdentityProvider`] talks to the hosted backend's auth API
//! - [`MemoryIdentityProvider`] keeps argon2 password hashes and opaque
//!   tokens in memory, for tests and local runs

mod memory;
mod remote;

pub use memory::MemoryIdentityProvider;
pub use remote::RemoteIdentityProvider;

use async_trait::async_trait;
use axum::http::{HeaderMap, header::AUTHORIZATION};
use thiserror::Error;

use juliecraft_core::{Email, ProfileId};

/// Who a verified token belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: ProfileId,
    pub email: Option<Email>,
}

/// Successful password sign-in.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub identity: Identity,
    /// Bearer token to hand back to the client.
    pub access_token: String,
}

/// Errors from an identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider does not recognize the token (or it expired).
    #[error("invalid or expired token")]
    InvalidToken,

    /// Wrong email/password pair.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Registering an email that already has an account.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Transport failure reaching the provider.
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an unexpected status.
    #[error("identity provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The provider answered 2xx with a body we could not use.
    #[error("unexpected identity provider response: {0}")]
    InvalidResponse(String),

    /// Password hashing failed.
    #[error("password hashing error")]
    PasswordHash,
}

/// Verifies bearer tokens and exchanges passwords for them.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Resolve a bearer token to the identity it was issued for.
    async fn verify_token(&self, token: &str) -> Result<Identity, IdentityError>;

    /// Exchange an email/password pair for a bearer token.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<SignIn, IdentityError>;

    /// Invalidate a token on the provider side.
    async fn sign_out(&self, token: &str) -> Result<(), IdentityError>;
}

/// Why a request carried no usable bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("Missing authorization header")]
    Missing,
    #[error("Malformed authorization header")]
    Malformed,
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively; an empty token is malformed.
///
/// # Errors
///
/// Returns [`BearerError::Missing`] without the header and
/// [`BearerError::Malformed`] for any other scheme or an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::Malformed)?;

    let (scheme, token) = value.split_once(' ').ok_or(BearerError::Malformed)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(BearerError::Malformed);
    }
    Ok(token)
}
