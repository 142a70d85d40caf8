//! Instrument entity model and DTOs.

use planpm_core::projection::ProjectionInstrument;
use planpm_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Instrument lifecycle statuses accepted by the `ck_instruments_status` check.
pub const VALID_INSTRUMENT_STATUSES: &[&str] =
    &["Operational", "Needs Maintenance", "Out of Service", "Archived"];

/// A row from the `instruments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Instrument {
    pub id: DbId,
    /// Human-facing equipment code, unique across the inventory.
    pub eqp_id: String,
    pub instrument_type: String,
    pub location: String,
    pub model: Option<String>,
    pub make: Option<String>,
    pub serial_number: Option<String>,
    pub status: String,
    pub usage_patterns: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Instrument> for ProjectionInstrument {
    fn from(row: &Instrument) -> Self {
        Self {
            id: row.id,
            eqp_id: row.eqp_id.clone(),
            instrument_type: row.instrument_type.clone(),
            location: row.location.clone(),
        }
    }
}

/// DTO for creating a new instrument.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstrument {
    pub eqp_id: String,
    pub instrument_type: String,
    pub location: String,
    pub model: Option<String>,
    pub make: Option<String>,
    pub serial_number: Option<String>,
    /// Defaults to `Operational` if omitted.
    pub status: Option<String>,
    pub usage_patterns: Option<String>,
}

/// DTO for updating an existing instrument. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateInstrument {
    pub eqp_id: Option<String>,
    pub instrument_type: Option<String>,
    pub location: Option<String>,
    pub model: Option<String>,
    pub make: Option<String>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub usage_patterns: Option<String>,
}
