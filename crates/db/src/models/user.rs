//! User entity model and DTOs.

use planpm_core::access::Permissions;
use planpm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub role_id: DbId,
    pub permissions: serde_json::Value,
    pub password_reset_required: bool,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub failed_login_count: i32,
    pub locked_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Stored permission map, defaults applied when the JSON is malformed.
    pub fn permissions(&self) -> Permissions {
        Permissions::from_json(&self.permissions)
    }

    /// Build the API view of this user given its resolved role name.
    pub fn to_response(&self, role: String) -> UserResponse {
        UserResponse {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            display_name: self.display_name.clone(),
            role,
            role_id: self.role_id,
            permissions: self.permissions(),
            password_reset_required: self.password_reset_required,
            is_super_admin: self.is_super_admin,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Resolved role name (`"admin"` or `"user"`).
    pub role: String,
    pub role_id: DbId,
    pub permissions: Permissions,
    pub password_reset_required: bool,
    pub is_super_admin: bool,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a new user. The password is already hashed.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub password_hash: String,
    pub role_id: DbId,
    pub permissions: serde_json::Value,
    pub is_super_admin: bool,
}

/// DTO for updating an existing user. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role_id: Option<DbId>,
    pub permissions: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}
