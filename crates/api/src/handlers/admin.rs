//! Handlers for the `/admin` resource (user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planpm_core::access::{internal_email, validate_password, Permissions};
use planpm_core::error::CoreError;
use planpm_core::roles::ROLE_USER;
use planpm_core::types::DbId;
use planpm_db::models::role::Role;
use planpm_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use planpm_db::repositories::{RoleRepo, SessionRepo, UserRepo};
use serde::Deserialize;

use super::required_text;
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
    /// Role name; defaults to `user`.
    pub role: Option<String>,
    /// Defaults to view access on dashboard and maintenance history.
    pub permissions: Option<Permissions>,
}

/// Request body for `PUT /admin/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub permissions: Option<Permissions>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a user with an internal login email derived from the username.
/// The user must change the password on first login.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let username = required_text("username", &input.username)?;
    validate_password(&input.password)?;

    let role = resolve_role(&state, input.role.as_deref().unwrap_or(ROLE_USER)).await?;
    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    let permissions = input.permissions.unwrap_or_default();

    let create_dto = CreateUser {
        email: internal_email(&username),
        username,
        display_name: input.display_name,
        password_hash: hashed,
        role_id: role.id,
        permissions: permissions_json(&permissions)?,
        is_super_admin: false,
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;

    tracing::info!(
        user_id = user.id,
        username = %user.username,
        role = %role.name,
        created_by = admin.user_id,
        "User created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: user.to_response(role.name),
        }),
    ))
}

/// GET /api/v1/admin/users
///
/// List all users with resolved role names.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;

    // Pre-fetch all roles to avoid N+1 queries.
    let roles = RoleRepo::list(&state.pool).await?;

    let data = users
        .iter()
        .map(|u| u.to_response(role_name(&roles, u.role_id)))
        .collect();

    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = find_user(&state, id).await?;
    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: user.to_response(role),
    }))
}

/// PUT /api/v1/admin/users/{id}
///
/// Update display name, role, permissions or active flag (not password).
/// The super admin can be neither demoted nor deactivated.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let existing = find_user(&state, id).await?;

    let role = match input.role.as_deref() {
        Some(name) => Some(resolve_role(&state, name).await?),
        None => None,
    };

    if existing.is_super_admin {
        let demoted = role.as_ref().is_some_and(|r| r.id != existing.role_id);
        if demoted || input.is_active == Some(false) {
            return Err(AppError::Core(CoreError::Forbidden(
                "The super admin account cannot be demoted or deactivated".into(),
            )));
        }
    }

    let update_dto = UpdateUser {
        email: None,
        display_name: input.display_name,
        role_id: role.as_ref().map(|r| r.id),
        permissions: input.permissions.as_ref().map(permissions_json).transpose()?,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))?;

    if input.is_active == Some(false) {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }

    tracing::info!(user_id = id, updated_by = admin.user_id, "User updated");

    let role = RoleRepo::resolve_name(&state.pool, user.role_id).await?;
    Ok(Json(DataResponse {
        data: user.to_response(role),
    }))
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Set a new password and force a change on next login. Revokes sessions.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password(&input.new_password)?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let updated = UserRepo::update_password(&state.pool, id, &hashed, true).await?;
    if !updated {
        return Err(AppError::Core(CoreError::NotFound { entity: "User", id }));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, reset_by = admin.user_id, "Password reset by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/admin/users/{id}
///
/// Permanently delete a user. The super admin and the caller's own account
/// are protected.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let user = find_user(&state, id).await?;

    if user.is_super_admin {
        return Err(AppError::Core(CoreError::Forbidden(
            "The super admin account cannot be deleted".into(),
        )));
    }
    if user.id == admin.user_id {
        return Err(AppError::Core(CoreError::Conflict(
            "You cannot delete your own account".into(),
        )));
    }

    UserRepo::delete(&state.pool, id).await?;
    tracing::info!(user_id = id, deleted_by = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_user(state: &AppState, id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User", id }))
}

async fn resolve_role(state: &AppState, name: &str) -> AppResult<Role> {
    RoleRepo::find_by_name(&state.pool, name.trim())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Validation(format!("Unknown role: '{name}'"))))
}

fn role_name(roles: &[Role], role_id: DbId) -> String {
    roles
        .iter()
        .find(|r| r.id == role_id)
        .map(|r| r.name.clone())
        .unwrap_or_else(|| "unknown".to_string())
}

fn permissions_json(permissions: &Permissions) -> AppResult<serde_json::Value> {
    serde_json::to_value(permissions)
        .map_err(|e| AppError::InternalError(format!("Permission encoding error: {e}")))
}
