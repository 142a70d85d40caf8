//! Recurring maintenance configuration model and DTOs.

use planpm_core::projection::ProjectionConfiguration;
use planpm_core::types::{DbId, Day, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `maintenance_configurations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceConfiguration {
    pub id: DbId,
    pub instrument_id: DbId,
    pub maintenance_type: String,
    /// Raw recurrence label; validated on write but not constrained in SQL.
    pub frequency: String,
    pub schedule_date: Day,
    pub template_id: Option<DbId>,
    pub is_active: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&MaintenanceConfiguration> for ProjectionConfiguration {
    fn from(row: &MaintenanceConfiguration) -> Self {
        Self {
            id: row.id,
            instrument_id: row.instrument_id,
            maintenance_type: row.maintenance_type.clone(),
            frequency: row.frequency.clone(),
            schedule_date: row.schedule_date,
            template_id: row.template_id,
        }
    }
}

/// DTO for creating a configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceConfiguration {
    pub instrument_id: DbId,
    pub maintenance_type: String,
    pub frequency: String,
    pub schedule_date: Day,
    pub template_id: Option<DbId>,
}

/// DTO for updating a configuration. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMaintenanceConfiguration {
    pub maintenance_type: Option<String>,
    pub frequency: Option<String>,
    pub schedule_date: Option<Day>,
    pub template_id: Option<DbId>,
    pub is_active: Option<bool>,
    /// Detach the template. Takes precedence over `template_id`.
    #[serde(default)]
    pub clear_template: bool,
}
