//! Error types for catalog-harvest
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use std::fmt;
use thiserror::Error;

/// What a failed fetch was trying to retrieve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    /// The total-count probe
    Stats,
    /// A page starting at the given offset
    Page { offset: u64 },
}

impl fmt::Display for FetchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stats => f.write_str("stats"),
            Self::Page { offset } => write!(f, "page at offset {offset}"),
        }
    }
}

/// The main error type for catalog-harvest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Fetch Errors
    // ============================================================================
    #[error("Failed to fetch {target}: {source}")]
    Fetch {
        target: FetchTarget,
        #[source]
        source: Box<Error>,
    },

    #[error("Unexpected response shape: {message}")]
    Decode { message: String },

    #[error("JSONPath error: {message}")]
    JsonPath { message: String },

    // ============================================================================
    // Pool Errors
    // ============================================================================
    #[error("Task {task} failed: {source}")]
    Pool {
        task: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Task {task} panicked: {message}")]
    TaskPanicked { task: usize, message: String },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Wrap an error with the fetch target it belongs to
    pub fn fetch(target: FetchTarget, source: Error) -> Self {
        Self::Fetch {
            target,
            source: Box::new(source),
        }
    }

    /// Wrap a task failure with its submission index
    pub fn pool(task: usize, source: Error) -> Self {
        Self::Pool {
            task,
            source: Box::new(source),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Check if this error is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::InvalidConfigValue { .. }
                | Error::YamlParse(_)
                | Error::JsonParse(_)
                | Error::InvalidUrl(_)
        )
    }

    /// Check if this error is worth another attempt.
    ///
    /// Requests are fixed-body reads, so any failure without a response
    /// (connect, timeout, send) qualifies, as does a 5xx status.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.status().map_or_else(
                || e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
                |status| status.is_server_error(),
            ),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    status >= 500
}

/// Result type alias for catalog-harvest
pub type Result<T> = std::result::Result<T, Error>;
