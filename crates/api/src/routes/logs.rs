use axum::routing::post;
use axum::Router;

use crate::handlers::logs;
use crate::state::AppState;

/// Routes mounted at `/logs`.
///
/// ```text
/// POST /client   -> client_log (no auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/client", post(logs::client_log))
}
