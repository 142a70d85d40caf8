//! Role-based access control (RBAC) extractors and module permission checks.
//!
//! Role checks happen at the type level through the extractors. Module
//! permissions are stored per user, so they are checked inside handlers with
//! [`require_permission`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use planpm_core::access::{ensure_access, Module, PermissionLevel};
use planpm_core::error::CoreError;
use planpm_db::repositories::UserRepo;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for routes
/// where "this requires authentication" should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Check that `user` has at least `required` access to `module`.
///
/// Admins pass without a database round trip. Other users' permissions are
/// read fresh from the `users` row so changes apply without re-login.
pub async fn require_permission(
    state: &AppState,
    user: &AuthUser,
    module: Module,
    required: PermissionLevel,
) -> AppResult<()> {
    if user.is_admin() {
        return Ok(());
    }

    let row = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;
    if !row.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    ensure_access(&user.role, &row.permissions(), module, required)?;
    Ok(())
}
