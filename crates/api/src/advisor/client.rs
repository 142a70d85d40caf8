//! Messages-API client with retry and exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use planpm_core::advisor::{
    build_prompt, parse_prediction, PredictionRequest, PredictionResponse, SYSTEM_PROMPT,
};
use serde::{Deserialize, Serialize};

use super::{AdvisorConfig, AdvisorError, FailurePredictor};

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP timeout for a single attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.kind == "text")
            .and_then(|b| b.text.as_deref())
    }
}

/// [`FailurePredictor`] backed by a hosted model.
pub struct HttpFailurePredictor {
    client: reqwest::Client,
    config: AdvisorConfig,
}

impl HttpFailurePredictor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("planpm-api/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    /// Execute one request and return the reply text.
    async fn try_send(&self, body: &MessagesRequest<'_>) -> Result<String, AdvisorError> {
        let response = self
            .client
            .post(&self.config.api_url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .text()
            .map(str::to_string)
            .ok_or_else(|| AdvisorError::InvalidReply("reply contained no text block".into()))
    }
}

#[async_trait]
impl FailurePredictor for HttpFailurePredictor {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, AdvisorError> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: build_prompt(request),
            }],
        };

        let mut attempt = 0;
        let text = loop {
            match self.try_send(&body).await {
                Ok(text) => break text,
                Err(e) if e.should_retry() && attempt < RETRY_DELAYS_SECS.len() => {
                    let delay = RETRY_DELAYS_SECS[attempt];
                    attempt += 1;
                    tracing::warn!(
                        attempt,
                        delay_secs = delay,
                        error = %e,
                        "Advisor request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_secs(delay)).await;
                }
                Err(e) => {
                    tracing::error!(attempt = attempt + 1, error = %e, "Advisor request failed");
                    return Err(e);
                }
            }
        };

        parse_prediction(&text).map_err(|e| AdvisorError::InvalidReply(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_text_block() {
        let json = r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "hello"}]}"#;
        let parsed: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.text(), Some("hello"));
    }

    #[test]
    fn request_body_shape() {
        let body = MessagesRequest {
            model: "m",
            max_tokens: MAX_TOKENS,
            system: SYSTEM_PROMPT,
            messages: vec![Message {
                role: "user",
                content: "hi".into(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json["system"].as_str().unwrap().contains("maintenance"));
    }
}
