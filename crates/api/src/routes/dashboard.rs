//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /projection        -> projection
/// GET /summary           -> summary (?window=30|90)
/// GET /summary/export    -> export (?window=30|90, text/html)
/// GET /overview          -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projection", get(dashboard::projection))
        .route("/summary", get(dashboard::summary))
        .route("/summary/export", get(dashboard::export))
        .route("/overview", get(dashboard::overview))
}
