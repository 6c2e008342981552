//! Error taxonomy shared by every operation of the crate.
//!
//! Every variant carries a human-readable message. Only
//! [`AppError::NetworkUnreachable`] makes the access layer fall back to the
//! local store; every other variant is surfaced to the caller as-is.

use lmdb::Error as LmdbError;
use reqwest::Error as HttpError;
use serde_json::Error as SerdeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected locally before any I/O.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend could not be reached at all (connection refused, DNS, ...).
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Non-2xx answer from the backend. Displays the extracted message only.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HTTP client failure that happened after a connection was made.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    pub fn is_network_unreachable(&self) -> bool {
        matches!(self, AppError::NetworkUnreachable(_))
    }

    /// Message without the variant prefix, as a caller would render it.
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::NetworkUnreachable(msg)
            | AppError::Configuration(msg)
            | AppError::Transport(msg)
            | AppError::Serialization(msg)
            | AppError::Database(msg) => msg,
            AppError::Api { message, .. } => message,
        }
    }
}

impl From<HttpError> for AppError {
    fn from(err: HttpError) -> Self {
        if err.is_connect() {
            AppError::NetworkUnreachable(err.to_string())
        } else if err.is_decode() {
            AppError::Serialization(format!("Invalid response body: {err}"))
        } else {
            AppError::Transport(err.to_string())
        }
    }
}

impl From<SerdeError> for AppError {
    fn from(err: SerdeError) -> Self {
        AppError::Serialization(format!("JSON serialization error: {err}"))
    }
}

impl From<LmdbError> for AppError {
    fn from(err: LmdbError) -> Self {
        match err {
            LmdbError::NotFound => AppError::NotFound("Key not found in local database".to_string()),
            LmdbError::MapFull => AppError::Database("Local database is full".to_string()),
            _ => AppError::Database(format!("LMDB error: {err}")),
        }
    }
}
