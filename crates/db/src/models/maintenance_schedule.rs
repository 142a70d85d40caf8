//! Stored maintenance schedule model and DTOs.

use planpm_core::summary::ScheduleRecord;
use planpm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `maintenance_schedules` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceSchedule {
    pub id: DbId,
    pub instrument_id: DbId,
    pub configuration_id: Option<DbId>,
    pub maintenance_type: String,
    pub description: Option<String>,
    pub status: String,
    pub due_date: Timestamp,
    pub completed_date: Option<Timestamp>,
    pub maintenance_by: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_contact: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Schedule row joined with its instrument's equipment code.
///
/// `eqp_id` is `None` only if the join found nothing, which the export
/// renders with a generic label.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleWithInstrument {
    pub id: DbId,
    pub instrument_id: DbId,
    pub maintenance_type: String,
    pub status: String,
    pub due_date: Timestamp,
    pub completed_date: Option<Timestamp>,
    pub eqp_id: Option<String>,
}

impl ScheduleWithInstrument {
    pub fn record(&self) -> ScheduleRecord {
        ScheduleRecord {
            id: self.id,
            instrument_id: self.instrument_id,
            maintenance_type: self.maintenance_type.clone(),
            status: self.status.clone(),
            due_date: self.due_date,
            completed_date: self.completed_date,
        }
    }
}

/// DTO for creating a schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceSchedule {
    pub instrument_id: DbId,
    pub configuration_id: Option<DbId>,
    pub maintenance_type: String,
    pub description: Option<String>,
    /// Defaults to `Scheduled` if omitted.
    pub status: Option<String>,
    pub due_date: Timestamp,
    pub maintenance_by: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_contact: Option<String>,
    pub notes: Option<String>,
}

/// DTO for updating a schedule. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaintenanceSchedule {
    pub maintenance_type: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub maintenance_by: Option<String>,
    pub vendor_name: Option<String>,
    pub vendor_contact: Option<String>,
    pub notes: Option<String>,
}
