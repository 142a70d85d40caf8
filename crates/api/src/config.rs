use std::str::FromStr;

use crate::advisor::AdvisorConfig;
use crate::auth::jwt::JwtConfig;

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Browser origins allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Fail projections on orphaned or unknown-frequency configurations
    /// instead of skipping them.
    pub projection_strict: bool,
    pub jwt: JwtConfig,
    /// Model API settings; `None` disables the advisor endpoint.
    pub advisor: Option<AdvisorConfig>,
}

impl ServerConfig {
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `PROJECTION_STRICT`    | `false`                    |
    ///
    /// JWT and advisor settings are read by [`JwtConfig::from_env`] and
    /// [`AdvisorConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on a value that does not parse, e.g. `PORT=http`.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0".to_string()),
            port: env_or("PORT", 3000),
            cors_origins: split_origins(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.into()),
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            projection_strict: std::env::var("PROJECTION_STRICT")
                .is_ok_and(|v| parse_flag(&v)),
            jwt: JwtConfig::from_env(),
            advisor: AdvisorConfig::from_env(),
        }
    }
}

const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{name} has invalid value '{raw}': {e}")),
        Err(_) => default,
    }
}

/// Comma-separated list, blanks dropped.
fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Interpret `1`, `true`, `yes` and `on` (any case) as enabled.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
