//! Repository for the `maintenance_types` table.

use planpm_core::types::DbId;
use sqlx::PgPool;

use crate::models::maintenance_type::MaintenanceType;

const COLUMNS: &str = "id, name, created_by, created_at, updated_at";

/// Provides CRUD operations for custom maintenance types.
pub struct MaintenanceTypeRepo;

impl MaintenanceTypeRepo {
    pub async fn create(
        pool: &PgPool,
        name: &str,
        created_by: DbId,
    ) -> Result<MaintenanceType, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_types (name, created_by)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceType>(&query)
            .bind(name)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_types WHERE id = $1");
        sqlx::query_as::<_, MaintenanceType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List custom types alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<MaintenanceType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_types ORDER BY LOWER(name) ASC");
        sqlx::query_as::<_, MaintenanceType>(&query)
            .fetch_all(pool)
            .await
    }

    /// Rename a type and every configuration and schedule that uses the old name.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<MaintenanceType>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let Some(existing) = sqlx::query_as::<_, MaintenanceType>(&format!(
            "SELECT {COLUMNS} FROM maintenance_types WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        else {
            return Ok(None);
        };

        let updated = sqlx::query_as::<_, MaintenanceType>(&format!(
            "UPDATE maintenance_types SET name = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        for table in ["maintenance_configurations", "maintenance_schedules"] {
            let result = sqlx::query(&format!(
                "UPDATE {table} SET maintenance_type = $2 WHERE LOWER(maintenance_type) = LOWER($1)"
            ))
            .bind(&existing.name)
            .bind(name)
            .execute(&mut *tx)
            .await?;
            tracing::debug!(
                table,
                rows = result.rows_affected(),
                from = %existing.name,
                to = %name,
                "Renamed maintenance type references",
            );
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Count configurations and schedules referencing `name`, ignoring case.
    pub async fn usage_count(pool: &PgPool, name: &str) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT
                (SELECT COUNT(*) FROM maintenance_configurations WHERE LOWER(maintenance_type) = LOWER($1))
              + (SELECT COUNT(*) FROM maintenance_schedules WHERE LOWER(maintenance_type) = LOWER($1))",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_types WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
