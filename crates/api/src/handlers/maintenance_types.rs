//! Handlers for the `/maintenance-types` resource.
//!
//! Listing is open to any authenticated user; changes need edit access to
//! the `settings` module.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use planpm_core::access::{Module, PermissionLevel};
use planpm_core::error::CoreError;
use planpm_core::maintenance_types::{is_default_type, merge_with_defaults, validate_type_name};
use planpm_core::types::DbId;
use planpm_db::models::maintenance_type::{
    CreateMaintenanceType, MaintenanceType, UpdateMaintenanceType,
};
use planpm_db::repositories::MaintenanceTypeRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{require_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Built-in and custom types as offered in pickers.
#[derive(Debug, Serialize)]
pub struct MaintenanceTypeList {
    /// Defaults first, then custom names, deduplicated ignoring case.
    pub names: Vec<String>,
    /// Stored custom rows (editable).
    pub custom: Vec<MaintenanceType>,
}

/// GET /api/v1/maintenance-types
pub async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<MaintenanceTypeList>>> {
    let custom = MaintenanceTypeRepo::list(&state.pool).await?;
    let names = merge_with_defaults(custom.iter().map(|t| t.name.as_str()));
    Ok(Json(DataResponse {
        data: MaintenanceTypeList { names, custom },
    }))
}

/// POST /api/v1/maintenance-types
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<CreateMaintenanceType>,
) -> AppResult<(StatusCode, Json<DataResponse<MaintenanceType>>)> {
    require_permission(&state, &user, Module::Settings, PermissionLevel::Edit).await?;

    let name = validate_custom_name(&input.name)?;
    let created = MaintenanceTypeRepo::create(&state.pool, &name, user.user_id).await?;

    tracing::info!(type_id = created.id, name = %created.name, "Maintenance type created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/maintenance-types/{id}
///
/// Renames the type along with every configuration and schedule using it.
pub async fn rename(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMaintenanceType>,
) -> AppResult<Json<DataResponse<MaintenanceType>>> {
    require_permission(&state, &user, Module::Settings, PermissionLevel::Edit).await?;

    let name = validate_custom_name(&input.name)?;
    let renamed = MaintenanceTypeRepo::rename(&state.pool, id, &name)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceType",
            id,
        }))?;

    tracing::info!(type_id = id, name = %renamed.name, "Maintenance type renamed");
    Ok(Json(DataResponse { data: renamed }))
}

/// DELETE /api/v1/maintenance-types/{id}
///
/// Refused with 409 while any configuration or schedule still uses the type.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    require_permission(&state, &user, Module::Settings, PermissionLevel::Edit).await?;

    let existing = MaintenanceTypeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MaintenanceType",
            id,
        }))?;

    let usage = MaintenanceTypeRepo::usage_count(&state.pool, &existing.name).await?;
    if usage > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Maintenance type '{}' is used by {usage} configuration(s) or schedule(s)",
            existing.name
        ))));
    }

    MaintenanceTypeRepo::delete(&state.pool, id).await?;
    tracing::info!(type_id = id, name = %existing.name, "Maintenance type deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Validate a custom type name; built-in names cannot be stored.
fn validate_custom_name(name: &str) -> Result<String, CoreError> {
    let name = validate_type_name(name)?;
    if is_default_type(&name) {
        return Err(CoreError::Conflict(format!(
            "'{name}' is a built-in maintenance type"
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn built_in_names_are_rejected() {
        assert_matches!(validate_custom_name(" amc "), Err(CoreError::Conflict(_)));
        assert_matches!(validate_custom_name(""), Err(CoreError::Validation(_)));
        assert_eq!(validate_custom_name(" Calibration ").unwrap(), "Calibration");
    }
}
