//! Dashboard read models: the projected calendar, summary buckets, the
//! printable export and headline counts.
//!
//! Every endpoint needs view access to the `dashboard` module.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use planpm_core::access::{Module, PermissionLevel};
use planpm_core::export::{
    render_summary_document, summary_heading, ExportRow, ExportSection, SECTION_COMPLETED,
    SECTION_OVERDUE, SECTION_PARTIAL, SECTION_UPCOMING,
};
use planpm_core::projection::{
    count_by_type, project, today_utc, ProjectedEvent, ProjectionConfiguration,
    ProjectionInstrument, ProjectionIssue, TypeCount,
};
use planpm_core::summary::{
    days_out, due_chip, preview, summarize, BucketPreview, ScheduleRecord, SummaryBuckets,
    SUMMARY_PREVIEW_LIMIT,
};
use planpm_core::types::{DbId, Timestamp};
use planpm_db::models::dashboard::DashboardCounts;
use planpm_db::repositories::{
    DashboardRepo, InstrumentRepo, MaintenanceConfigurationRepo, MaintenanceScheduleRepo,
};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::{require_permission, RequireAuth};
use crate::query::WindowParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Upcoming occurrences of the caller's active configurations.
#[derive(Debug, Serialize)]
pub struct ProjectionResponse {
    pub today: NaiveDate,
    pub events: Vec<ProjectedEvent>,
    pub by_type: Vec<TypeCount>,
    /// Configurations that were skipped (always empty in strict mode).
    pub issues: Vec<ProjectionIssue>,
}

/// One schedule line in a summary bucket.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryItem {
    pub id: DbId,
    pub instrument_id: DbId,
    pub eqp_id: Option<String>,
    pub maintenance_type: String,
    pub status: String,
    pub due_date: Timestamp,
    pub completed_date: Option<Timestamp>,
    pub days_out: i64,
    pub due_chip: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub window_days: i64,
    pub heading: String,
    pub generated_at: Timestamp,
    pub overdue: BucketPreview<SummaryItem>,
    pub upcoming: BucketPreview<SummaryItem>,
    pub partial: BucketPreview<SummaryItem>,
    pub completed: BucketPreview<SummaryItem>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard/projection
///
/// In strict mode (`PROJECTION_STRICT=true`) a configuration with an unknown
/// frequency or a missing instrument fails the request with 422. Otherwise
/// such configurations are skipped, logged and reported in `issues`.
pub async fn projection(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<ProjectionResponse>>> {
    require_permission(&state, &user, Module::Dashboard, PermissionLevel::View).await?;

    let configs = MaintenanceConfigurationRepo::list_active(&state.pool, Some(user.user_id)).await?;
    let instruments = InstrumentRepo::list(&state.pool).await?;

    let configs: Vec<ProjectionConfiguration> = configs.iter().map(Into::into).collect();
    let instruments: Vec<ProjectionInstrument> = instruments.iter().map(Into::into).collect();
    let today = today_utc(Utc::now());
    let projection = project(&configs, &instruments, today);

    let (events, issues) = if state.config.projection_strict {
        (projection.into_strict()?, Vec::new())
    } else {
        for issue in &projection.issues {
            tracing::warn!(
                user_id = user.user_id,
                issue = ?issue,
                "Skipped configuration during projection",
            );
        }
        (projection.events, projection.issues)
    };

    tracing::debug!(
        user_id = user.user_id,
        configurations = configs.len(),
        events = events.len(),
        "Projected maintenance calendar",
    );

    Ok(Json(DataResponse {
        data: ProjectionResponse {
            today,
            by_type: count_by_type(&events),
            events,
            issues,
        },
    }))
}

/// GET /api/v1/dashboard/summary?window=30|90
///
/// Each bucket lists its first few schedules and how many more exist.
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<WindowParams>,
) -> AppResult<Json<DataResponse<SummaryResponse>>> {
    require_permission(&state, &user, Module::Dashboard, PermissionLevel::View).await?;
    let window = params.window()?;

    let rows = MaintenanceScheduleRepo::list_with_instruments(&state.pool).await?;
    let eqp_ids: HashMap<DbId, Option<String>> =
        rows.iter().map(|r| (r.id, r.eqp_id.clone())).collect();
    let records: Vec<ScheduleRecord> = rows.iter().map(|r| r.record()).collect();

    let now = Utc::now();
    let buckets = summarize(&records, now, window);
    let [overdue, upcoming, partial, completed] = bucket_items(&buckets, &eqp_ids, now);

    Ok(Json(DataResponse {
        data: SummaryResponse {
            window_days: window.days(),
            heading: summary_heading(window),
            generated_at: now,
            overdue: preview(&overdue, SUMMARY_PREVIEW_LIMIT),
            upcoming: preview(&upcoming, SUMMARY_PREVIEW_LIMIT),
            partial: preview(&partial, SUMMARY_PREVIEW_LIMIT),
            completed: preview(&completed, SUMMARY_PREVIEW_LIMIT),
        },
    }))
}

/// GET /api/v1/dashboard/summary/export?window=30|90
///
/// A printable HTML document with every schedule in each bucket.
pub async fn export(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<WindowParams>,
) -> AppResult<impl IntoResponse> {
    require_permission(&state, &user, Module::Dashboard, PermissionLevel::View).await?;
    let window = params.window()?;

    let rows = MaintenanceScheduleRepo::list_with_instruments(&state.pool).await?;
    let eqp_ids: HashMap<DbId, Option<String>> =
        rows.iter().map(|r| (r.id, r.eqp_id.clone())).collect();
    let records: Vec<ScheduleRecord> = rows.iter().map(|r| r.record()).collect();

    let now = Utc::now();
    let buckets = summarize(&records, now, window);
    let sections = [
        (SECTION_OVERDUE, &buckets.overdue),
        (SECTION_UPCOMING, &buckets.upcoming),
        (SECTION_PARTIAL, &buckets.partial),
        (SECTION_COMPLETED, &buckets.completed),
    ]
    .map(|(title, bucket)| ExportSection {
        title,
        rows: bucket
            .iter()
            .map(|r| ExportRow {
                instrument: eqp_ids.get(&r.id).cloned().flatten(),
                maintenance_type: r.maintenance_type.clone(),
                due_date: r.due_date,
                status: r.status.clone(),
            })
            .collect(),
    });

    let html = render_summary_document(window, now, &sections);
    tracing::info!(user_id = user.user_id, window_days = window.days(), "Summary exported");
    Ok(([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html))
}

/// GET /api/v1/dashboard/overview
pub async fn overview(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<DashboardCounts>>> {
    require_permission(&state, &user, Module::Dashboard, PermissionLevel::View).await?;
    let counts = DashboardRepo::counts(&state.pool).await?;
    Ok(Json(DataResponse::new(counts)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bucket_items(
    buckets: &SummaryBuckets<'_>,
    eqp_ids: &HashMap<DbId, Option<String>>,
    now: Timestamp,
) -> [Vec<SummaryItem>; 4] {
    [
        &buckets.overdue,
        &buckets.upcoming,
        &buckets.partial,
        &buckets.completed,
    ]
    .map(|bucket| {
        bucket
            .iter()
            .map(|r| summary_item(r, eqp_ids.get(&r.id).cloned().flatten(), now))
            .collect()
    })
}

fn summary_item(record: &ScheduleRecord, eqp_id: Option<String>, now: Timestamp) -> SummaryItem {
    let days = days_out(record.due_date, now);
    SummaryItem {
        id: record.id,
        instrument_id: record.instrument_id,
        eqp_id,
        maintenance_type: record.maintenance_type.clone(),
        status: record.status.clone(),
        due_date: record.due_date,
        completed_date: record.completed_date,
        days_out: days,
        due_chip: due_chip(days),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn summary_item_carries_due_chip() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let record = ScheduleRecord {
            id: 4,
            instrument_id: 9,
            maintenance_type: "AMC".to_string(),
            status: "Scheduled".to_string(),
            due_date: now - Duration::days(3),
            completed_date: None,
        };
        let item = summary_item(&record, Some("EQP-9".to_string()), now);
        assert_eq!(item.days_out, -3);
        assert_eq!(item.due_chip, "3d overdue");
        assert_eq!(item.eqp_id.as_deref(), Some("EQP-9"));
    }
}
