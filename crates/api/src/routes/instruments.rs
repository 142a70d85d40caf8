//! Route definitions for the `/instruments` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::instruments;
use crate::state::AppState;

/// Routes mounted at `/instruments`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(instruments::list).post(instruments::create))
        .route(
            "/{id}",
            get(instruments::get_by_id)
                .put(instruments::update)
                .delete(instruments::delete),
        )
}
