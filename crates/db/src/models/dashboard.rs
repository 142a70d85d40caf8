//! Dashboard headline counts.

use serde::Serialize;
use sqlx::FromRow;

/// Aggregate counters for the dashboard overview cards.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct DashboardCounts {
    pub instruments: i64,
    pub instruments_needing_maintenance: i64,
    pub active_configurations: i64,
    pub open_schedules: i64,
    pub overdue_schedules: i64,
    pub results_last_30_days: i64,
}
