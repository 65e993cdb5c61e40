//! Error taxonomy for the crawl pipeline.
//!
//! Transient fetch failures are retried and then recorded against the URL
//! that caused them; only configuration and persistence failures abort a run.

use thiserror::Error;

/// Transport-level failures, retried up to the configured limit.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out: {url}")]
    Timeout { url: String },

    #[error("HTTP status {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("retries exhausted after {attempts} attempts for {url}: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Map a reqwest transport error onto the crawl taxonomy.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout {
                url: url.to_string(),
            };
        }
        if let Some(status) = err.status() {
            return Self::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            };
        }
        Self::Network {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Fatal configuration problems, detected before any network activity.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting '{field}'")]
    MissingField { field: &'static str },

    #[error("invalid URL in '{field}': {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("invalid CSS selector in '{field}': {selector}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
    },

    #[error("failed to read configuration file {path}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Dataset write failures. Fatal for the run, but the atomic write discipline
/// guarantees the previously persisted file is left intact.
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("failed to serialize dataset")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write dataset to {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to replace {path} with the updated dataset")]
    Replace {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
