//! Repository for the `maintenance_results` table.

use planpm_core::summary::SCHEDULE_COMPLETED;
use planpm_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::maintenance_result::{
    CreateMaintenanceResult, MaintenanceResult, MaintenanceResultListItem,
};

const COLUMNS: &str = "id, schedule_id, instrument_id, result_type, notes, test_data, \
                        completed_date, recorded_by, created_at, updated_at";

/// Provides recording and listing of maintenance results.
pub struct MaintenanceResultRepo;

impl MaintenanceResultRepo {
    /// Record a result and mark its schedule completed, atomically.
    ///
    /// Returns `None` if the schedule does not exist.
    pub async fn record(
        pool: &PgPool,
        input: &CreateMaintenanceResult,
        recorded_by: DbId,
    ) -> Result<Option<MaintenanceResult>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let schedule: Option<(DbId,)> = sqlx::query_as(
            "SELECT instrument_id FROM maintenance_schedules WHERE id = $1 FOR UPDATE",
        )
        .bind(input.schedule_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((instrument_id,)) = schedule else {
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO maintenance_results
                (schedule_id, instrument_id, result_type, notes, test_data, completed_date, recorded_by)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7)
             RETURNING {COLUMNS}"
        );
        let result = sqlx::query_as::<_, MaintenanceResult>(&insert)
            .bind(input.schedule_id)
            .bind(instrument_id)
            .bind(&input.result_type)
            .bind(&input.notes)
            .bind(Json(&input.test_data))
            .bind(input.completed_date)
            .bind(recorded_by)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE maintenance_schedules SET status = $2, completed_date = $3 WHERE id = $1",
        )
        .bind(input.schedule_id)
        .bind(SCHEDULE_COMPLETED)
        .bind(result.completed_date)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(result))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceResult>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_results WHERE id = $1");
        sqlx::query_as::<_, MaintenanceResult>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Results with instrument and schedule context, newest first.
    pub async fn list_with_context(
        pool: &PgPool,
    ) -> Result<Vec<MaintenanceResultListItem>, sqlx::Error> {
        sqlx::query_as::<_, MaintenanceResultListItem>(
            "SELECT r.id, r.schedule_id, r.instrument_id, r.result_type, r.notes, r.test_data,
                    r.completed_date, i.eqp_id, i.instrument_type, s.maintenance_type
             FROM maintenance_results r
             LEFT JOIN instruments i ON i.id = r.instrument_id
             LEFT JOIN maintenance_schedules s ON s.id = r.schedule_id
             ORDER BY r.completed_date DESC, r.id DESC",
        )
        .fetch_all(pool)
        .await
    }
}
