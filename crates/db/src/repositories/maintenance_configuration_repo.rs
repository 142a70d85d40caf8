//! Repository for the `maintenance_configurations` table.

use planpm_core::types::DbId;
use sqlx::PgPool;

use crate::models::maintenance_configuration::{
    CreateMaintenanceConfiguration, MaintenanceConfiguration, UpdateMaintenanceConfiguration,
};

const COLUMNS: &str = "id, instrument_id, maintenance_type, frequency, schedule_date, template_id, \
                        is_active, created_by, created_at, updated_at";

/// Provides CRUD operations for recurring maintenance configurations.
pub struct MaintenanceConfigurationRepo;

impl MaintenanceConfigurationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateMaintenanceConfiguration,
        created_by: DbId,
    ) -> Result<MaintenanceConfiguration, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_configurations
                (instrument_id, maintenance_type, frequency, schedule_date, template_id, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceConfiguration>(&query)
            .bind(input.instrument_id)
            .bind(&input.maintenance_type)
            .bind(&input.frequency)
            .bind(input.schedule_date)
            .bind(input.template_id)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceConfiguration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_configurations WHERE id = $1");
        sqlx::query_as::<_, MaintenanceConfiguration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List configurations, optionally restricted to one creator.
    ///
    /// `created_by = None` lists every user's configurations.
    pub async fn list(
        pool: &PgPool,
        created_by: Option<DbId>,
    ) -> Result<Vec<MaintenanceConfiguration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_configurations
             WHERE ($1::BIGINT IS NULL OR created_by = $1)
             ORDER BY schedule_date ASC, id ASC"
        );
        sqlx::query_as::<_, MaintenanceConfiguration>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Active configurations feeding the projector, in id order.
    pub async fn list_active(
        pool: &PgPool,
        created_by: Option<DbId>,
    ) -> Result<Vec<MaintenanceConfiguration>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_configurations
             WHERE is_active AND ($1::BIGINT IS NULL OR created_by = $1)
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, MaintenanceConfiguration>(&query)
            .bind(created_by)
            .fetch_all(pool)
            .await
    }

    /// Update a configuration. Only non-`None` fields in `input` are applied,
    /// except that `clear_template` sets `template_id` to NULL.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMaintenanceConfiguration,
    ) -> Result<Option<MaintenanceConfiguration>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_configurations SET
                maintenance_type = COALESCE($2, maintenance_type),
                frequency = COALESCE($3, frequency),
                schedule_date = COALESCE($4, schedule_date),
                template_id = CASE WHEN $7 THEN NULL ELSE COALESCE($5, template_id) END,
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceConfiguration>(&query)
            .bind(id)
            .bind(&input.maintenance_type)
            .bind(&input.frequency)
            .bind(input.schedule_date)
            .bind(input.template_id)
            .bind(input.is_active)
            .bind(input.clear_template)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_configurations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
