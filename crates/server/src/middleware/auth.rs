//! Authentication and admin-authorization extractors.
//!
//! The header is checked before the backend so a request without a token is
//! always a 401, configured backend or not.

use axum::{extract::FromRequestParts, http::request::Parts};

use juliecraft_core::{Email, ProfileId};

use crate::error::{AppError, set_sentry_user};
use crate::identity::{Identity, IdentityError, bearer_token};
use crate::models::Profile;
use crate::services::authz::{AdminLevel, Capability, check_admin};
use crate::state::AppState;

/// A caller whose bearer token the identity provider accepted.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: ProfileId,
    pub email: Option<Email>,
    /// The raw token, needed to sign out.
    pub token: String,
}

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Authenticated(caller): Authenticated) -> String {
///     caller.id.to_string()
/// }
/// ```
pub struct Authenticated(pub Caller);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let backend = state.backend()?;

        // Any failure of the verify call means the token is not usable
        let Identity { id, email } = backend
            .identity()
            .verify_token(token)
            .await
            .map_err(|e| {
                if !matches!(e, IdentityError::InvalidToken) {
                    tracing::warn!(error = %e, "Token verification failed");
                }
                AppError::Unauthorized("Invalid or expired token".to_string())
            })?;

        set_sentry_user(&id, email.as_ref().map(Email::as_str));

        Ok(Self(Caller {
            id,
            email,
            token: token.to_string(),
        }))
    }
}

/// An authenticated caller that passed [`check_admin`].
#[derive(Debug, Clone)]
pub struct AdminCaller {
    pub caller: Caller,
    pub profile: Profile,
    pub level: AdminLevel,
}

/// Extractor that requires admin access (any level).
pub struct RequireAdmin(pub AdminCaller);

/// Extractor that requires super admin access.
pub struct RequireSuperAdmin(pub AdminCaller);

async fn authorize(parts: &mut Parts, state: &AppState) -> Result<AdminCaller, AppError> {
    let Authenticated(caller) = Authenticated::from_request_parts(parts, state).await?;
    let profile = state.backend()?.profiles().get(caller.id).await?;

    match (check_admin(profile.as_ref()), profile) {
        (Capability::Authorized(level), Some(profile)) => Ok(AdminCaller {
            caller,
            profile,
            level,
        }),
        (Capability::Denied(reason), _) => {
            tracing::info!(user_id = %caller.id, %reason, "Admin access denied");
            Err(AppError::Forbidden(reason.to_string()))
        }
        (Capability::Authorized(_), None) => {
            Err(AppError::Internal("authorized without a profile".to_string()))
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        authorize(parts, state).await.map(Self)
    }
}

impl FromRequestParts<AppState> for RequireSuperAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = authorize(parts, state).await?;
        if admin.level != AdminLevel::SuperAdmin {
            return Err(AppError::Forbidden(
                "Super admin access required".to_string(),
            ));
        }
        Ok(Self(admin))
    }
}
