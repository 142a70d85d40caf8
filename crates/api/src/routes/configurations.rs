//! Route definitions for the `/configurations` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::configurations;
use crate::state::AppState;

/// Routes mounted at `/configurations`.
///
/// ```text
/// GET    /        -> list (caller's own)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(configurations::list).post(configurations::create))
        .route(
            "/{id}",
            get(configurations::get_by_id)
                .put(configurations::update)
                .delete(configurations::delete),
        )
}
