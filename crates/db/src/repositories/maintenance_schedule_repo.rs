//! Repository for the `maintenance_schedules` table.

use planpm_core::summary::SCHEDULE_COMPLETED;
use planpm_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::maintenance_schedule::{
    CreateMaintenanceSchedule, MaintenanceSchedule, ScheduleWithInstrument,
    UpdateMaintenanceSchedule,
};

const COLUMNS: &str = "id, instrument_id, configuration_id, maintenance_type, description, status, \
                        due_date, completed_date, maintenance_by, vendor_name, vendor_contact, \
                        notes, created_at, updated_at";

/// Provides CRUD and status transitions for stored schedules.
pub struct MaintenanceScheduleRepo;

impl MaintenanceScheduleRepo {
    /// Insert a new schedule. `status` defaults to `Scheduled`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMaintenanceSchedule,
    ) -> Result<MaintenanceSchedule, sqlx::Error> {
        let query = format!(
            "INSERT INTO maintenance_schedules
                (instrument_id, configuration_id, maintenance_type, description, status, due_date,
                 maintenance_by, vendor_name, vendor_contact, notes)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'Scheduled'), $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(input.instrument_id)
            .bind(input.configuration_id)
            .bind(&input.maintenance_type)
            .bind(&input.description)
            .bind(&input.status)
            .bind(input.due_date)
            .bind(&input.maintenance_by)
            .bind(&input.vendor_name)
            .bind(&input.vendor_contact)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<MaintenanceSchedule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM maintenance_schedules WHERE id = $1");
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List schedules by due date, optionally for one instrument.
    pub async fn list(
        pool: &PgPool,
        instrument_id: Option<DbId>,
    ) -> Result<Vec<MaintenanceSchedule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM maintenance_schedules
             WHERE ($1::BIGINT IS NULL OR instrument_id = $1)
             ORDER BY due_date ASC, id ASC"
        );
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(instrument_id)
            .fetch_all(pool)
            .await
    }

    /// Every schedule with its instrument's equipment code, by due date.
    pub async fn list_with_instruments(
        pool: &PgPool,
    ) -> Result<Vec<ScheduleWithInstrument>, sqlx::Error> {
        sqlx::query_as::<_, ScheduleWithInstrument>(
            "SELECT s.id, s.instrument_id, s.maintenance_type, s.status, s.due_date,
                    s.completed_date, i.eqp_id
             FROM maintenance_schedules s
             LEFT JOIN instruments i ON i.id = s.instrument_id
             ORDER BY s.due_date ASC, s.id ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Update a schedule's details. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMaintenanceSchedule,
    ) -> Result<Option<MaintenanceSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_schedules SET
                maintenance_type = COALESCE($2, maintenance_type),
                description = COALESCE($3, description),
                due_date = COALESCE($4, due_date),
                maintenance_by = COALESCE($5, maintenance_by),
                vendor_name = COALESCE($6, vendor_name),
                vendor_contact = COALESCE($7, vendor_contact),
                notes = COALESCE($8, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(id)
            .bind(&input.maintenance_type)
            .bind(&input.description)
            .bind(input.due_date)
            .bind(&input.maintenance_by)
            .bind(&input.vendor_name)
            .bind(&input.vendor_contact)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Move a schedule to `status`.
    ///
    /// Completing stamps `completed_date` (the given instant, else the
    /// existing one, else now). Any other status clears it.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        completed_date: Option<Timestamp>,
    ) -> Result<Option<MaintenanceSchedule>, sqlx::Error> {
        let query = format!(
            "UPDATE maintenance_schedules SET
                status = $2,
                completed_date = CASE WHEN $2 = $4
                    THEN COALESCE($3, completed_date, NOW())
                    ELSE NULL END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MaintenanceSchedule>(&query)
            .bind(id)
            .bind(status)
            .bind(completed_date)
            .bind(SCHEDULE_COMPLETED)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM maintenance_schedules WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
