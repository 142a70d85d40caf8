//! Handlers for the `/instruments` resource.
//!
//! Reads need view access to the `instruments` module, writes need edit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planpm_core::access::{Module, PermissionLevel};
use planpm_core::error::CoreError;
use planpm_core::types::DbId;
use planpm_db::models::instrument::{
    CreateInstrument, Instrument, UpdateInstrument, VALID_INSTRUMENT_STATUSES,
};
use planpm_db::repositories::InstrumentRepo;

use super::required_text;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{require_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/instruments
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut input): Json<CreateInstrument>,
) -> AppResult<(StatusCode, Json<DataResponse<Instrument>>)> {
    require_permission(&state, &user, Module::Instruments, PermissionLevel::Edit).await?;

    input.eqp_id = required_text("eqp_id", &input.eqp_id)?;
    input.instrument_type = required_text("instrument_type", &input.instrument_type)?;
    input.location = required_text("location", &input.location)?;
    if let Some(status) = &input.status {
        validate_instrument_status(status)?;
    }

    let instrument = InstrumentRepo::create(&state.pool, &input).await?;
    tracing::info!(
        instrument_id = instrument.id,
        eqp_id = %instrument.eqp_id,
        user_id = user.user_id,
        "Instrument created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: instrument })))
}

/// GET /api/v1/instruments
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<Instrument>>>> {
    require_permission(&state, &user, Module::Instruments, PermissionLevel::View).await?;
    let instruments = InstrumentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: instruments }))
}

/// GET /api/v1/instruments/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Instrument>>> {
    require_permission(&state, &user, Module::Instruments, PermissionLevel::View).await?;
    let instrument = InstrumentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instrument",
            id,
        }))?;
    Ok(Json(DataResponse { data: instrument }))
}

/// PUT /api/v1/instruments/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateInstrument>,
) -> AppResult<Json<DataResponse<Instrument>>> {
    require_permission(&state, &user, Module::Instruments, PermissionLevel::Edit).await?;

    input.eqp_id = input
        .eqp_id
        .as_deref()
        .map(|v| required_text("eqp_id", v))
        .transpose()?;
    input.instrument_type = input
        .instrument_type
        .as_deref()
        .map(|v| required_text("instrument_type", v))
        .transpose()?;
    input.location = input
        .location
        .as_deref()
        .map(|v| required_text("location", v))
        .transpose()?;
    if let Some(status) = &input.status {
        validate_instrument_status(status)?;
    }

    let instrument = InstrumentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Instrument",
            id,
        }))?;
    Ok(Json(DataResponse { data: instrument }))
}

/// DELETE /api/v1/instruments/{id}
///
/// Cascades to the instrument's configurations, schedules and results.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state, &user, Module::Instruments, PermissionLevel::Edit).await?;

    let deleted = InstrumentRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Instrument",
            id,
        }));
    }
    tracing::info!(instrument_id = id, user_id = user.user_id, "Instrument deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn validate_instrument_status(status: &str) -> Result<(), CoreError> {
    if VALID_INSTRUMENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown instrument status: '{status}'. Valid statuses: {}",
            VALID_INSTRUMENT_STATUSES.join(", ")
        )))
    }
}
