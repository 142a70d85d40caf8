//! First-run account setup.

use planpm_core::access::{internal_email, validate_password, Permissions};
use planpm_core::error::CoreError;
use planpm_core::roles::ROLE_ADMIN_ID;
use planpm_db::models::user::CreateUser;
use planpm_db::repositories::UserRepo;
use planpm_db::DbPool;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};

/// Initial super admin credentials, read from the environment.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl BootstrapAdmin {
    /// | Env Var                     |
    /// |-----------------------------|
    /// | `BOOTSTRAP_ADMIN_USERNAME`  |
    /// | `BOOTSTRAP_ADMIN_PASSWORD`  |
    ///
    /// Returns `None` unless both are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?;
        let password = std::env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?;
        if username.trim().is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}

/// Create the super admin account when the `users` table is empty.
///
/// Returns `true` if an account was created. The password must already
/// satisfy the account policy; the user is still asked to change it on
/// first login.
pub async fn ensure_super_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(false);
    }
    validate_password(&admin.password)?;

    let username = admin.username.trim().to_string();
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))?;
    let permissions = serde_json::to_value(Permissions::default())
        .map_err(|e| AppError::Core(CoreError::Internal(e.to_string())))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: internal_email(&username),
            username,
            display_name: None,
            password_hash,
            role_id: ROLE_ADMIN_ID,
            permissions,
            is_super_admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Bootstrap super admin created");
    Ok(true)
}
