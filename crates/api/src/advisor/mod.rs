//! Predictive maintenance advisor.
//!
//! [`FailurePredictor`] is the seam handlers talk to; [`HttpFailurePredictor`]
//! is the production implementation calling a hosted language model.

mod client;

pub use client::HttpFailurePredictor;

use async_trait::async_trait;
use planpm_core::advisor::{PredictionRequest, PredictionResponse};

/// Default model endpoint (Messages API).
pub const DEFAULT_ADVISOR_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Default model identifier.
pub const DEFAULT_ADVISOR_MODEL: &str = "claude-sonnet-4-20250514";

/// Model API settings.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
}

impl AdvisorConfig {
    /// Load advisor settings from environment variables.
    ///
    /// | Env Var           | Required | Default                    |
    /// |-------------------|----------|----------------------------|
    /// | `ADVISOR_API_KEY` | yes      | -- (advisor disabled)      |
    /// | `ADVISOR_API_URL` | no       | [`DEFAULT_ADVISOR_API_URL`] |
    /// | `ADVISOR_MODEL`   | no       | [`DEFAULT_ADVISOR_MODEL`]  |
    ///
    /// Returns `None` when no API key is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("ADVISOR_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;

        Some(Self {
            api_url: std::env::var("ADVISOR_API_URL")
                .unwrap_or_else(|_| DEFAULT_ADVISOR_API_URL.into()),
            api_key,
            model: std::env::var("ADVISOR_MODEL").unwrap_or_else(|_| DEFAULT_ADVISOR_MODEL.into()),
        })
    }
}

/// Error type for failure-prediction calls.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The model API returned a non-2xx status code.
    #[error("Model API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The model replied, but not with a usable prediction.
    #[error("Invalid model reply: {0}")]
    InvalidReply(String),
}

impl AdvisorError {
    /// Transient failures worth another attempt.
    pub fn should_retry(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            Self::HttpStatus { status, .. } => *status == 429 || (500..=599).contains(status),
            Self::InvalidReply(_) => false,
        }
    }
}

/// Produces a failure prediction for an instrument.
#[async_trait]
pub trait FailurePredictor: Send + Sync {
    async fn predict(&self, request: &PredictionRequest)
        -> Result<PredictionResponse, AdvisorError>;
}
