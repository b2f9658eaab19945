use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};

const DEFAULT_API_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_LOG_FILE: &str = "logs.txt";
const DEFAULT_UPSTREAM_TIMEOUT_MS: u64 = 30_000;

/// Application configuration, read once at process start and injected into
/// state construction.  Nothing else reads the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer credential for the completion provider.  Absent, blank or
    /// placeholder values activate the canned fallback path.
    pub api_key: Option<String>,
    /// Chat-completions endpoint URL.
    pub api_endpoint: String,
    /// Audit log target.  `None` disables auditing.
    pub log_file: Option<String>,
    /// Timeout applied to the outbound completion request.
    pub upstream_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            log_file: None,
            upstream_timeout: Duration::from_millis(DEFAULT_UPSTREAM_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    /// Build configuration from environment variables:
    ///
    /// * `TEXTAID_API_KEY` (optional) – provider credential.
    /// * `TEXTAID_API_ENDPOINT` (optional) – provider URL.
    /// * `TEXTAID_UPSTREAM_TIMEOUT_MS` (optional) – outbound timeout, default 30000.
    /// * `LOG_FILE` (optional) – audit log path, default `logs.txt`; set to
    ///   an empty string to disable auditing.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("TEXTAID_API_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let api_endpoint = env::var("TEXTAID_API_ENDPOINT")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_ENDPOINT.to_string());

        let upstream_timeout_ms =
            parse_optional_u64("TEXTAID_UPSTREAM_TIMEOUT_MS")?.unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_MS);

        let log_file = match env::var("LOG_FILE") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(value),
            Err(_) => Some(DEFAULT_LOG_FILE.to_string()),
        };

        Ok(Self {
            api_key,
            api_endpoint,
            log_file,
            upstream_timeout: Duration::from_millis(upstream_timeout_ms),
        })
    }
}

fn parse_optional_u64(var: &str) -> Result<Option<u64>> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| anyhow!("{} must be a positive integer", var)),
        Ok(_) => Ok(None),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
