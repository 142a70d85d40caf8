//! Custom maintenance type model and DTOs.

use planpm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user-defined row from the `maintenance_types` table.
///
/// Built-in types are not stored; see `planpm_core::maintenance_types`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MaintenanceType {
    pub id: DbId,
    pub name: String,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMaintenanceType {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateMaintenanceType {
    pub name: String,
}
