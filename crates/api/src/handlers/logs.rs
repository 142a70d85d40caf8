//! Client-side log intake.
//!
//! The browser reports its own errors here so they land in the server log
//! stream alongside request traces.

use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

/// Longest message kept; the rest is cut off.
pub const MAX_CLIENT_LOG_LEN: usize = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientLogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Deserialize)]
pub struct ClientLogEntry {
    pub level: ClientLogLevel,
    pub message: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
}

/// POST /api/v1/logs/client
pub async fn client_log(Json(entry): Json<ClientLogEntry>) -> StatusCode {
    let message = truncate(&entry.message, MAX_CLIENT_LOG_LEN);
    let context = entry.context.map(|c| c.to_string()).unwrap_or_default();

    match entry.level {
        ClientLogLevel::Debug => tracing::debug!(target: "client", context = %context, "{message}"),
        ClientLogLevel::Info => tracing::info!(target: "client", context = %context, "{message}"),
        ClientLogLevel::Warn => tracing::warn!(target: "client", context = %context, "{message}"),
        ClientLogLevel::Error => tracing::error!(target: "client", context = %context, "{message}"),
    }
    StatusCode::NO_CONTENT
}

/// Cut `s` to at most `max` bytes on a character boundary.
fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
