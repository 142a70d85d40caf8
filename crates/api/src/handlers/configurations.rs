//! Handlers for the `/configurations` resource.
//!
//! A configuration is a recurring maintenance rule for one instrument. Each
//! user sees and projects only the configurations they created; admins may
//! also change other users' rules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planpm_core::access::{Module, PermissionLevel};
use planpm_core::error::CoreError;
use planpm_core::frequency::Frequency;
use planpm_core::maintenance_types::validate_type_name;
use planpm_core::types::DbId;
use planpm_db::models::maintenance_configuration::{
    CreateMaintenanceConfiguration, MaintenanceConfiguration, UpdateMaintenanceConfiguration,
};
use planpm_db::repositories::{InstrumentRepo, MaintenanceConfigurationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{require_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/configurations
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(mut input): Json<CreateMaintenanceConfiguration>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceConfiguration>>)> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;

    input.maintenance_type = validate_type_name(&input.maintenance_type)?;
    input.frequency = Frequency::from_str(&input.frequency)?.as_str().to_string();

    if InstrumentRepo::find_by_id(&state.pool, input.instrument_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Instrument",
            id: input.instrument_id,
        }));
    }

    let config = MaintenanceConfigurationRepo::create(&state.pool, &input, user.user_id).await?;
    tracing::info!(
        configuration_id = config.id,
        instrument_id = config.instrument_id,
        frequency = %config.frequency,
        user_id = user.user_id,
        "Maintenance configuration created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: config })))
}

/// GET /api/v1/configurations
///
/// The caller's own configurations, active and inactive.
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<MaintenanceConfiguration>>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::View).await?;
    let configs = MaintenanceConfigurationRepo::list(&state.pool, Some(user.user_id)).await?;
    Ok(Json(DataResponse { data: configs }))
}

/// GET /api/v1/configurations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<MaintenanceConfiguration>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::View).await?;
    let config = find_owned(&state, &user, id).await?;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /api/v1/configurations/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateMaintenanceConfiguration>,
) -> AppResult<Json<DataResponse<MaintenanceConfiguration>>> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;
    find_owned(&state, &user, id).await?;

    input.maintenance_type = input
        .maintenance_type
        .as_deref()
        .map(validate_type_name)
        .transpose()?;
    input.frequency = input
        .frequency
        .as_deref()
        .map(|f| Frequency::from_str(f).map(|f| f.as_str().to_string()))
        .transpose()?;

    let config = MaintenanceConfigurationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceConfiguration",
            id,
        }))?;
    Ok(Json(DataResponse { data: config }))
}

/// DELETE /api/v1/configurations/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state, &user, Module::UpdateMaintenance, PermissionLevel::Edit).await?;
    find_owned(&state, &user, id).await?;

    MaintenanceConfigurationRepo::delete(&state.pool, id).await?;
    tracing::info!(
        configuration_id = id,
        user_id = user.user_id,
        "Maintenance configuration deleted",
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Load a configuration the caller may see.
///
/// Other users' configurations are reported as missing to non-admins.
async fn find_owned(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<MaintenanceConfiguration> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "MaintenanceConfiguration",
            id,
        })
    };
    let config = MaintenanceConfigurationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    if !user.is_admin() && config.created_by != Some(user.user_id) {
        return Err(not_found());
    }
    Ok(config)
}
