//! Handler for the predictive maintenance advisor.

use axum::extract::State;
use axum::Json;
use planpm_core::advisor::{PredictionRequest, PredictionResponse};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/advisor/predict
///
/// Returns 503 when no advisor API key is configured.
pub async fn predict(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<PredictionRequest>,
) -> AppResult<Json<DataResponse<PredictionResponse>>> {
    input.validate()?;

    let predictor = state.predictor.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Failure prediction is not configured".to_string())
    })?;

    let prediction = predictor.predict(&input).await?;
    tracing::info!(
        user_id = user.user_id,
        instrument = %input.instrument_name,
        likelihood = %prediction.failure_likelihood,
        "Failure prediction served",
    );
    Ok(Json(DataResponse::new(prediction)))
}
