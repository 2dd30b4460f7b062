//! User management handlers (super admin surface)
//!
//! Role assignment and the bulk ban action. All of it is gated on
//! `may_manage_roles`; an admin who is not a super admin gets 403 here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use quillpress_common::{
    auth::AuthContext,
    db::Repository,
    errors::{AppError, Result},
    policy::{self, Role},
};

#[derive(Serialize)]
pub struct ManagedUser {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_banned: bool,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ManageUsersResponse {
    pub users: Vec<ManagedUser>,
}

/// All users with their roles and ban state
pub async fn manage_users(
    State(state): State<AppState>,
    auth: AuthContext,
) -> Result<Json<ManageUsersResponse>> {
    policy::require(
        policy::may_manage_roles(&auth.actor()),
        "Only super admins can manage users",
    )?;

    let repo = Repository::new(state.db.clone());

    let users = repo
        .list_users_with_profiles()
        .await?
        .into_iter()
        .map(|(user, profile)| ManagedUser {
            user_id: user.id,
            username: user.username,
            email: user.email,
            role: quillpress_common::db::models::profile_role(profile.as_ref()),
            is_banned: quillpress_common::db::models::profile_is_banned(profile.as_ref()),
            created_at: user.created_at.to_rfc3339(),
        })
        .collect();

    Ok(Json(ManageUsersResponse { users }))
}

#[derive(Serialize)]
pub struct RoleChangeResponse {
    pub user_id: Uuid,
    pub role: Role,
}

/// Grant the ADMIN role
pub async fn assign_admin(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RoleChangeResponse>> {
    policy::require(
        policy::may_manage_roles(&auth.actor()),
        "Only super admins can assign roles",
    )?;

    let repo = Repository::new(state.db.clone());

    repo.find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: user_id.to_string(),
        })?;

    let profile = repo.set_role(user_id, Role::Admin).await?;

    tracing::info!(user_id = %user_id, granted_by = %auth.user_id, "Admin role assigned");

    Ok(Json(RoleChangeResponse {
        user_id,
        role: profile.role(),
    }))
}

/// Revoke the ADMIN role, back to USER. Idempotent: a user who never had
/// the role (or has no profile yet) still ends up as USER.
pub async fn remove_admin(
    State(state): State<AppState>,
    auth: AuthContext,
    Path(user_id): Path<Uuid>,
) -> Result<Json<RoleChangeResponse>> {
    policy::require(
        policy::may_manage_roles(&auth.actor()),
        "Only super admins can remove roles",
    )?;

    let repo = Repository::new(state.db.clone());

    repo.find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::UserNotFound {
            id: user_id.to_string(),
        })?;

    let profile = repo.set_role(user_id, Role::User).await?;

    tracing::info!(user_id = %user_id, revoked_by = %auth.user_id, "Admin role removed");

    Ok(Json(RoleChangeResponse {
        user_id,
        role: profile.role(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct BanRequest {
    pub user_ids: Vec<Uuid>,

    /// true bans, false lifts the ban
    #[serde(default = "default_banned")]
    pub banned: bool,
}

fn default_banned() -> bool {
    true
}

#[derive(Serialize)]
pub struct BanResponse {
    pub updated: usize,
    pub banned: bool,
}

/// Bulk ban or unban a list of users
pub async fn ban_users(
    State(state): State<AppState>,
    auth: AuthContext,
    Json(request): Json<BanRequest>,
) -> Result<Json<BanResponse>> {
    policy::require(
        policy::may_manage_roles(&auth.actor()),
        "Only super admins can ban users",
    )?;

    let repo = Repository::new(state.db.clone());
    let updated = repo.set_banned(&request.user_ids, request.banned).await?;

    tracing::info!(
        count = updated,
        banned = request.banned,
        actor_id = %auth.user_id,
        "Ban state updated"
    );

    Ok(Json(BanResponse {
        updated,
        banned: request.banned,
    }))
}
