//! Maintenance result model and DTOs.

use planpm_core::results::{overall_status, OverallStatus, TestSection};
use planpm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `maintenance_results` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceResult {
    pub id: DbId,
    pub schedule_id: DbId,
    pub instrument_id: DbId,
    pub result_type: String,
    pub notes: Option<String>,
    /// Serialized `Vec<TestSection>`.
    pub test_data: serde_json::Value,
    pub completed_date: Timestamp,
    pub recorded_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result joined with the instrument and schedule fields the history page shows.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceResultListItem {
    pub id: DbId,
    pub schedule_id: DbId,
    pub instrument_id: DbId,
    pub result_type: String,
    pub notes: Option<String>,
    pub test_data: serde_json::Value,
    pub completed_date: Timestamp,
    pub eqp_id: Option<String>,
    pub instrument_type: Option<String>,
    pub maintenance_type: Option<String>,
}

impl MaintenanceResultListItem {
    /// Decoded test sections. Rows stored in an older shape decode as empty.
    pub fn sections(&self) -> Vec<TestSection> {
        serde_json::from_value(self.test_data.clone()).unwrap_or_default()
    }

    pub fn overall_status(&self) -> Option<OverallStatus> {
        overall_status(&self.sections())
    }
}

/// DTO for recording a result against a schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceResult {
    pub schedule_id: DbId,
    pub result_type: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub test_data: Vec<TestSection>,
    /// Defaults to now.
    pub completed_date: Option<Timestamp>,
}
