//! Predictive maintenance advisor contract.
//!
//! Defines the request/response shapes exchanged with the language model,
//! the prompt sent to it and the parser for its reply. The HTTP client lives
//! in the API crate.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Longest accepted value for any single request field.
pub const MAX_FIELD_LEN: usize = 20_000;

/// What the advisor is asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Name of the instrument to analyze.
    pub instrument_name: String,
    /// Detailed history of maintenance performed on the instrument.
    pub maintenance_history: String,
    /// How the instrument is typically used, including frequency and intensity.
    pub usage_patterns: String,
}

/// The advisor's assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Likelihood of failure, e.g. `High`, `Medium` or `Low`.
    pub failure_likelihood: String,
    /// Actionable recommendations to prevent the failure.
    pub recommended_actions: String,
}

impl PredictionRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        for (field, value) in [
            ("instrument_name", &self.instrument_name),
            ("maintenance_history", &self.maintenance_history),
            ("usage_patterns", &self.usage_patterns),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Validation(format!("{field} must not be empty")));
            }
            if value.len() > MAX_FIELD_LEN {
                return Err(CoreError::Validation(format!(
                    "{field} exceeds maximum length of {MAX_FIELD_LEN} characters"
                )));
            }
        }
        Ok(())
    }
}

/// System instruction sent with every prediction.
pub const SYSTEM_PROMPT: &str = "You are an AI assistant that analyzes instrument maintenance \
history and usage patterns for clinical and pharma lab instruments to predict potential failures \
and recommend proactive maintenance.";

/// Render the user prompt for a request.
pub fn build_prompt(request: &PredictionRequest) -> String {
    format!(
        "Analyze the following information to determine the likelihood of failure and suggest \
         proactive maintenance actions.\n\n\
         Instrument Name: {}\n\
         Maintenance History: {}\n\
         Usage Patterns: {}\n\n\
         Respond with only a JSON object of the form \
         {{\"failure_likelihood\": \"High|Medium|Low\", \"recommended_actions\": \"...\"}}.",
        request.instrument_name.trim(),
        request.maintenance_history.trim(),
        request.usage_patterns.trim(),
    )
}

/// Extract the prediction JSON object from the model's reply text.
///
/// Tolerates surrounding prose or code fences by parsing the outermost
/// `{ ... }` span.
pub fn parse_prediction(text: &str) -> Result<PredictionResponse, CoreError> {
    let start = text.find('{');
    let end = text.rfind('}');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(CoreError::Internal(
            "Advisor reply did not contain a JSON object".to_string(),
        ));
    };
    if end < start {
        return Err(CoreError::Internal(
            "Advisor reply did not contain a JSON object".to_string(),
        ));
    }

    serde_json::from_str(&text[start..=end])
        .map_err(|e| CoreError::Internal(format!("Advisor reply was not a valid prediction: {e}")))
}
