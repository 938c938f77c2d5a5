//! Sign-in, sign-out and "who am I".

use axum::{Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use juliecraft_core::Email;

use crate::error::{AppError, Result, clear_sentry_user};
use crate::extract::ApiJson;
use crate::identity::bearer_token;
use crate::middleware::Authenticated;
use crate::models::UserView;
use crate::state::AppState;

/// Login form data.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// Exchange email and password for a bearer token.
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let backend = state.backend()?;

    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::bad_request("Email and password are required"));
    };
    if password.is_empty() {
        return Err(AppError::bad_request("Email and password are required"));
    }
    let email = Email::parse(&email).map_err(|e| AppError::BadRequest {
        message: "Invalid email address".to_string(),
        details: Some(e.to_string()),
    })?;

    let signed_in = backend.identity().sign_in(&email, &password).await?;
    let identity = signed_in.identity;
    let profile = backend.profiles().get(identity.id).await?;

    tracing::info!(user_id = %identity.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful",
        user: UserView::new(identity.id, identity.email.or(Some(email)), profile.as_ref()),
        token: signed_in.access_token,
    }))
}

/// Revoke the caller's token.
///
/// Always reports success: a missing, invalid or already-revoked token, an
/// unconfigured backend and a provider failure all end in the same 200. The
/// failure is logged instead.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<LogoutResponse> {
    let response = Json(LogoutResponse {
        message: "Logged out successfully",
    });

    let Ok(token) = bearer_token(&headers) else {
        return response;
    };
    let Some(backend) = state.backend_opt() else {
        return response;
    };

    if let Err(e) = backend.identity().sign_out(token).await {
        tracing::warn!(error = %e, "Logout failed at the identity provider");
    }
    clear_sentry_user();

    response
}

/// The caller's user view.
#[instrument(skip_all, fields(user_id = %caller.id))]
pub async fn me(
    State(state): State<AppState>,
    Authenticated(caller): Authenticated,
) -> Result<Json<UserView>> {
    let profile = state.backend()?.profiles().get(caller.id).await?;
    Ok(Json(UserView::new(caller.id, caller.email, profile.as_ref())))
}
