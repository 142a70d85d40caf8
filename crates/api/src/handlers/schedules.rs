//! Handlers for the `/schedules` resource.
//!
//! Stored schedules are concrete maintenance visits. Their status drives the
//! dashboard summary buckets.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use planpm_core::access::{Module, PermissionLevel};
use planpm_core::error::CoreError;
use planpm_core::maintenance_types::validate_type_name;
use planpm_core::summary::validate_schedule_status;
use planpm_core::types::{DbId, Timestamp};
use planpm_db::models::maintenance_schedule::{
    CreateMaintenanceSchedule, MaintenanceSchedule, UpdateMaintenanceSchedule,
};
use planpm_db::repositories::{InstrumentRepo, MaintenanceScheduleRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{require_permission, RequireAuth};
use crate::query::InstrumentFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PUT /schedules/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    /// Completion instant; defaults to now when completing.
    pub completed_date: Option<Timestamp>,
}

/// POST /api/v1/schedules
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut input): Json<CreateMaintenanceSchedule>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceSchedule>>)> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;

    input.maintenance_type = validate_type_name(&input.maintenance_type)?;
    if let Some(status) = &input.status {
        validate_schedule_status(status)?;
    }
    if InstrumentRepo::find_by_id(&state.pool, input.instrument_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Instrument",
            id: input.instrument_id,
        }));
    }

    let schedule = MaintenanceScheduleRepo::create(&state.pool, &input).await?;
    tracing::info!(
        schedule_id = schedule.id,
        instrument_id = schedule.instrument_id,
        due_date = %schedule.due_date,
        "Maintenance schedule created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: schedule })))
}

/// GET /api/v1/schedules?instrument_id=
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(filter): Query<InstrumentFilter>,
) -> AppResult<Json<DataResponse<Vec<MaintenanceSchedule>>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::View).await?;
    let schedules = MaintenanceScheduleRepo::list(&state.pool, filter.instrument_id).await?;
    Ok(Json(DataResponse { data: schedules }))
}

/// GET /api/v1/schedules/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MaintenanceSchedule>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::View).await?;
    let schedule = MaintenanceScheduleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id,
        }))?;
    Ok(Json(DataResponse { data: schedule }))
}

/// PUT /api/v1/schedules/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateMaintenanceSchedule>,
) -> AppResult<Json<DataResponse<MaintenanceSchedule>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;

    input.maintenance_type = input
        .maintenance_type
        .as_deref()
        .map(validate_type_name)
        .transpose()?;

    let schedule = MaintenanceScheduleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id,
        }))?;
    Ok(Json(DataResponse { data: schedule }))
}

/// PUT /api/v1/schedules/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<Json<DataResponse<MaintenanceSchedule>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;
    validate_schedule_status(&input.status)?;

    let schedule =
        MaintenanceScheduleRepo::update_status(&state.pool, id, &input.status, input.completed_date)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "MaintenanceSchedule",
                id,
            }))?;

    tracing::info!(
        schedule_id = id,
        status = %schedule.status,
        user_id = user.user_id,
        "Maintenance schedule status changed",
    );
    Ok(Json(DataResponse { data: schedule }))
}

/// DELETE /api/v1/schedules/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;

    let deleted = MaintenanceScheduleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceSchedule",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
