//! Route definitions for the `/results` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::results;
use crate::state::AppState;

/// Routes mounted at `/results`.
///
/// ```text
/// GET    /        -> list (?search)
/// POST   /        -> record
/// GET    /{id}    -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(results::list).post(results::record))
        .route("/{id}", get(results::get_by_id))
}
