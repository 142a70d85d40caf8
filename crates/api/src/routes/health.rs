//! Liveness probe, mounted at the root rather than under `/api/v1`.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// The process is up but the database did not answer.
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub db_healthy: bool,
    pub advisor_configured: bool,
}

/// GET /health
///
/// Answers 200 even when degraded.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match planpm_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { HealthStatus::Ok } else { HealthStatus::Degraded },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        advisor_configured: state.predictor.is_some(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
