//! Repository for the fixed `roles` lookup table.

use planpm_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    /// Both roles, admin first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>("SELECT id, name, description FROM roles ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Look a role up by name, ignoring case.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description FROM roles WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(pool)
        .await
    }

    /// Name of the role with `role_id`, or `"unknown"` for a dangling id.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?;
        Ok(name.unwrap_or_else(|| "unknown".to_string()))
    }
}
