use std::sync::Arc;

use crate::advisor::FailurePredictor;
use crate::config::ServerConfig;

/// Handler state, cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub pool: planpm_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// `None` when `ADVISOR_API_KEY` is unset; `/advisor/predict` then answers 503.
    pub predictor: Option<Arc<dyn FailurePredictor>>,
}
