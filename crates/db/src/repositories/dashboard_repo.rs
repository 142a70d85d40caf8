//! Aggregate queries behind the dashboard overview.

use sqlx::PgPool;

use crate::models::dashboard::DashboardCounts;

pub struct DashboardRepo;

impl DashboardRepo {
    /// Headline counters. "Overdue" here means due in the past and not completed.
    pub async fn counts(pool: &PgPool) -> Result<DashboardCounts, sqlx::Error> {
        sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                (SELECT COUNT(*) FROM instruments) AS instruments,
                (SELECT COUNT(*) FROM instruments WHERE status = 'Needs Maintenance')
                    AS instruments_needing_maintenance,
                (SELECT COUNT(*) FROM maintenance_configurations WHERE is_active)
                    AS active_configurations,
                (SELECT COUNT(*) FROM maintenance_schedules WHERE status <> 'Completed')
                    AS open_schedules,
                (SELECT COUNT(*) FROM maintenance_schedules
                    WHERE status <> 'Completed' AND due_date < NOW()) AS overdue_schedules,
                (SELECT COUNT(*) FROM maintenance_results
                    WHERE completed_date >= NOW() - INTERVAL '30 days') AS results_last_30_days",
        )
        .fetch_one(pool)
        .await
    }
}
