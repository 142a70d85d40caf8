//! Handlers for the `/results` resource (maintenance history).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use planpm_core::access::{Module, PermissionLevel};
use planpm_core::error::CoreError;
use planpm_core::results::{matches_search, OverallStatus};
use planpm_core::types::DbId;
use planpm_db::models::maintenance_result::{
    CreateMaintenanceResult, MaintenanceResult, MaintenanceResultListItem,
};
use planpm_db::repositories::MaintenanceResultRepo;
use serde::Serialize;

use super::required_text;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{require_permission, RequireAuth};
use crate::query::SearchParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// A history row with its computed pass/fail verdict.
#[derive(Debug, Serialize)]
pub struct ResultSummary {
    #[serde(flatten)]
    pub result: MaintenanceResultListItem,
    /// `None` when no test row carries a verdict.
    pub overall_status: Option<OverallStatus>,
}

/// GET /api/v1/results?search=
///
/// Newest first. `search` matches equipment code, result type, notes,
/// instrument type and maintenance type, ignoring case.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<ResultSummary>>>> {
    require_permission(&state, &user, Module::MaintenanceHistory, PermissionLevel::View).await?;

    let term = params.search.unwrap_or_default();
    let results = MaintenanceResultRepo::list_with_context(&state.pool)
        .await?
        .into_iter()
        .filter(|r| matches_search(&term, search_fields(r)))
        .map(|result| ResultSummary {
            overall_status: result.overall_status(),
            result,
        })
        .collect();

    Ok(Json(DataResponse::new(results)))
}

/// GET /api/v1/results/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MaintenanceResult>>> {
    require_permission(&state, &user, Module::MaintenanceHistory, PermissionLevel::View).await?;
    let result = MaintenanceResultRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceResult",
            id,
        }))?;
    Ok(Json(DataResponse::new(result)))
}

/// POST /api/v1/results
///
/// Records the outcome of a schedule and marks the schedule completed.
pub async fn record(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut input): Json<CreateMaintenanceResult>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceResult>>)> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;
    input.result_type = required_text("result_type", &input.result_type)?;

    let result = MaintenanceResultRepo::record(&state.pool, &input, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id: input.schedule_id,
        }))?;

    tracing::info!(
        result_id = result.id,
        schedule_id = result.schedule_id,
        user_id = user.user_id,
        "Maintenance result recorded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(result))))
}

fn search_fields(r: &MaintenanceResultListItem) -> [Option<&str>; 5] {
    [
        r.eqp_id.as_deref(),
        Some(r.result_type.as_str()),
        r.notes.as_deref(),
        r.instrument_type.as_deref(),
        r.maintenance_type.as_deref(),
    ]
}
