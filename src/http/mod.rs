//! HTTP client module
//!
//! The retrying transport under every listing request.
//!
//! # Features
//!
//! - **Automatic Retries**: network failures and 5xx responses, never 4xx
//! - **Backoff Strategies**: constant, linear (default) and exponential
//! - **Rate Limiting**: optional token bucket throttle using governor

mod client;
mod rate_limit;
mod retry;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use retry::RetryPolicy;

#[cfg(test)]
mod tests;
