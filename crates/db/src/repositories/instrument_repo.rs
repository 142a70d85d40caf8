//! Repository for the `instruments` table.

use planpm_core::types::DbId;
use sqlx::PgPool;

use crate::models::instrument::{CreateInstrument, Instrument, UpdateInstrument};

const COLUMNS: &str = "id, eqp_id, instrument_type, location, model, make, serial_number, \
                        status, usage_patterns, created_at, updated_at";

/// Provides CRUD operations for instruments.
pub struct InstrumentRepo;

impl InstrumentRepo {
    /// Insert a new instrument. `status` defaults to `Operational`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateInstrument,
    ) -> Result<Instrument, sqlx::Error> {
        let query = format!(
            "INSERT INTO instruments
                (eqp_id, instrument_type, location, model, make, serial_number, status, usage_patterns)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'Operational'), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instrument>(&query)
            .bind(&input.eqp_id)
            .bind(&input.instrument_type)
            .bind(&input.location)
            .bind(&input.model)
            .bind(&input.make)
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(&input.usage_patterns)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Instrument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instruments WHERE id = $1");
        sqlx::query_as::<_, Instrument>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every instrument ordered by equipment code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Instrument>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instruments ORDER BY eqp_id ASC");
        sqlx::query_as::<_, Instrument>(&query).fetch_all(pool).await
    }

    /// Update an instrument. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInstrument,
    ) -> Result<Option<Instrument>, sqlx::Error> {
        let query = format!(
            "UPDATE instruments SET
                eqp_id = COALESCE($2, eqp_id),
                instrument_type = COALESCE($3, instrument_type),
                location = COALESCE($4, location),
                model = COALESCE($5, model),
                make = COALESCE($6, make),
                serial_number = COALESCE($7, serial_number),
                status = COALESCE($8, status),
                usage_patterns = COALESCE($9, usage_patterns)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instrument>(&query)
            .bind(id)
            .bind(&input.eqp_id)
            .bind(&input.instrument_type)
            .bind(&input.location)
            .bind(&input.model)
            .bind(&input.make)
            .bind(&input.serial_number)
            .bind(&input.status)
            .bind(&input.usage_patterns)
            .fetch_optional(pool)
            .await
    }

    /// Delete an instrument and, by cascade, its configurations, schedules
    /// and results. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM instruments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
