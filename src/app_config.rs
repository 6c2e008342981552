//! Static configuration of the access layer.
//!
//! Resolved once, before any operation runs. [`ApiConfig::from_env`] reads the
//! process environment after loading a `.env` file when one is present.

use std::env;
use std::time::Duration;

use log::{info, warn};

use crate::app_error::AppError;

pub const BACKEND_URL_VAR: &str = "BACKEND_URL";
pub const USE_MOCK_VAR: &str = "USE_MOCK";
pub const MOCK_LATENCY_MS_VAR: &str = "MOCK_LATENCY_MS";
pub const REQUEST_TIMEOUT_SECS_VAR: &str = "REQUEST_TIMEOUT_SECS";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiConfig {
    /// Base address of the backend, without trailing slash. Empty disables remote mode.
    pub base_url: String,
    /// When true the backend is never contacted.
    pub use_mock_data: bool,
    /// Artificial delay applied to local-store operations.
    pub mock_latency: Duration,
    /// Timeout handed to the HTTP client. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn remote(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(&base_url.into()),
            ..Self::default()
        }
    }

    pub fn mock() -> Self {
        Self {
            use_mock_data: true,
            ..Self::default()
        }
    }

    pub fn with_mock_latency(mut self, latency: Duration) -> Self {
        self.mock_latency = latency;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = trim_base_url(&lookup(BACKEND_URL_VAR).unwrap_or_default());
        let use_mock_data = lookup(USE_MOCK_VAR).is_some_and(|value| value.trim() == "true");
        let mock_latency = parse_number(&lookup, MOCK_LATENCY_MS_VAR)?
            .map(Duration::from_millis)
            .unwrap_or_default();
        let request_timeout =
            parse_number(&lookup, REQUEST_TIMEOUT_SECS_VAR)?.map(Duration::from_secs);

        let config = Self {
            base_url,
            use_mock_data,
            mock_latency,
            request_timeout,
        };

        if config.is_remote_unconfigured() {
            warn!("{BACKEND_URL_VAR} is not set and mock mode is off; car operations will fail with a configuration error");
        } else if config.use_mock_data {
            info!("Mock mode enabled; the backend will not be contacted");
        } else {
            info!("Using backend at {}", config.base_url);
        }

        Ok(config)
    }

    /// Remote mode requested without a base URL.
    pub fn is_remote_unconfigured(&self) -> bool {
        !self.use_mock_data && self.base_url.is_empty()
    }
}

fn trim_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Configuration(format!("{key} must be a whole number: {e}"))),
        _ => Ok(None),
    }
}
