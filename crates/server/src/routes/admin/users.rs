//! Staff account management.

use axum::{Json, extract::State};
use tracing::instrument;

use juliecraft_core::{AccountStatus, ProfileId, Role};

use crate::error::{AppError, Result};
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{RequireAdmin, RequireSuperAdmin};
use crate::models::{Profile, ProfileUpdate};
use crate::state::AppState;

/// All profiles, newest first.
#[instrument(skip_all, fields(admin_id = %admin.caller.id))]
pub async fn list(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<Profile>>> {
    let profiles = state.backend()?.profiles().list().await?;
    Ok(Json(profiles))
}

/// Change another account's role or status. Setting a role also sets
/// `is_admin` to match it.
#[instrument(skip_all, fields(admin_id = %admin.caller.id, target_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    ApiPath(id): ApiPath<ProfileId>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<Profile>> {
    if update.is_empty() {
        return Err(AppError::bad_request("Nothing to update: send role or status"));
    }

    // A super admin cannot lock themselves out
    let demotes_self = id == admin.caller.id
        && (update.role.is_some_and(|r| r != Role::SuperAdmin)
            || update.status == Some(AccountStatus::Inactive));
    if demotes_self {
        return Err(AppError::bad_request(
            "You cannot remove your own super admin access",
        ));
    }

    let profile = state
        .backend()?
        .profiles()
        .update_access(id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    tracing::info!(
        role = %profile.role,
        status = %profile.status,
        "User access updated"
    );
    Ok(Json(profile))
}
