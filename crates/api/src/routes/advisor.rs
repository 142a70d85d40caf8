use axum::routing::post;
use axum::Router;

use crate::handlers::advisor;
use crate::state::AppState;

/// Routes mounted at `/advisor`.
///
/// ```text
/// POST /predict   -> predict
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/predict", post(advisor::predict))
}
