//! Route definitions for the `/schedules` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::schedules;
use crate::state::AppState;

/// Routes mounted at `/schedules`.
///
/// ```text
/// GET    /                -> list (?instrument_id)
/// POST   /                -> create
/// GET    /{id}            -> get_by_id
/// PUT    /{id}            -> update
/// DELETE /{id}            -> delete
/// PUT    /{id}/status     -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schedules::list).post(schedules::create))
        .route(
            "/{id}",
            get(schedules::get_by_id)
                .put(schedules::update)
                .delete(schedules::delete),
        )
        .route("/{id}/status", put(schedules::update_status))
}
