//! Route definitions for the `/maintenance-types` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::maintenance_types;
use crate::state::AppState;

/// Routes mounted at `/maintenance-types`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// PUT    /{id}    -> rename
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(maintenance_types::list).post(maintenance_types::create),
        )
        .route(
            "/{id}",
            put(maintenance_types::rename).delete(maintenance_types::delete),
        )
}
