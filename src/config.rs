//! Run configuration
//!
//! A harvest is configured from a YAML or JSON document. Every field has a
//! default, but an input document must be supplied.
//!
//! ```yaml
//! store: ./storage            # local dir, s3://, r2://, gs://, az://
//! key: catalog
//! page_size: 25
//! max_concurrent_requests: 5
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: linear
//!   backoff_ms: 1000
//! source:
//!   endpoint: https://zapier.com/explore-api
//! ```

use crate::error::{Error, Result};
use crate::fetch::SourceConfig;
use crate::http::{HttpClientConfig, RateLimiterConfig, RetryPolicy};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete harvest configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Destination the sink writes to
    #[serde(alias = "keyValueStore")]
    pub store: String,

    /// Key the collection is stored under
    pub key: String,

    /// Items requested per page
    #[serde(alias = "pageSize")]
    pub page_size: u64,

    /// Pages fetched at the same time
    #[serde(alias = "maxConcurrentRequests")]
    pub max_concurrent_requests: usize,

    /// Transport settings
    pub http: HttpSettings,

    /// Listing endpoint and response layout
    pub source: SourceConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            store: "./storage".to_string(),
            key: "catalog".to_string(),
            page_size: 25,
            max_concurrent_requests: 5,
            http: HttpSettings::default(),
            source: SourceConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Validate the configuration before any request is made
    pub fn validate(&self) -> Result<()> {
        if self.store.trim().is_empty() {
            return Err(Error::invalid_value("store", "cannot be empty"));
        }
        if self.key.trim().is_empty() {
            return Err(Error::invalid_value("key", "cannot be empty"));
        }
        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(Error::invalid_value(
                "max_concurrent_requests",
                "must be at least 1",
            ));
        }

        self.http.validate()?;
        self.source.validate()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// Transport settings as they appear in the input document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after the first attempt
    pub max_retries: u32,

    /// Backoff shape
    pub backoff: BackoffType,

    /// Backoff unit in milliseconds
    pub backoff_ms: u64,

    /// Upper bound for one backoff delay in milliseconds
    pub max_backoff_ms: u64,

    /// Optional client-side throttle
    pub requests_per_second: Option<u32>,

    /// User agent override
    pub user_agent: Option<String>,

    /// Headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 3,
            backoff: BackoffType::Linear,
            backoff_ms: 1000,
            max_backoff_ms: 60_000,
            requests_per_second: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

impl HttpSettings {
    fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("http.timeout_secs", "must be at least 1"));
        }
        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "http.requests_per_second",
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }

    /// Retry policy described by these settings
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.backoff_ms))
            .with_backoff(self.backoff)
            .with_max_delay(Duration::from_millis(self.max_backoff_ms))
    }

    /// Build the HTTP client configuration
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .retry(self.retry_policy());

        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }
        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a configuration file (YAML or JSON)
pub fn load_config(path: impl AsRef<Path>) -> Result<HarvestConfig> {
    let config = parse_config(path)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate a configuration document (YAML or JSON)
pub fn load_config_from_str(content: &str) -> Result<HarvestConfig> {
    let config = parse_config_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Read a configuration file without validating it
pub fn parse_config(path: impl AsRef<Path>) -> Result<HarvestConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read input file '{}': {e}",
            path.display()
        ))
    })?;
    parse_config_str(&content).map_err(|e| match e {
        Error::YamlParse(_) | Error::JsonParse(_) => {
            Error::config(format!("Invalid input file '{}': {e}", path.display()))
        }
        other => other,
    })
}

/// Parse a configuration document without validating it.
///
/// Used when overrides are applied before validation.
pub fn parse_config_str(content: &str) -> Result<HarvestConfig> {
    if content.trim().is_empty() {
        return Err(Error::config("Input is empty"));
    }

    Ok(serde_yaml::from_str(content)?)
}
