//! # catalog-harvest
//!
//! Fetches a paginated listing from a remote API, retrieves every page under
//! a bounded-concurrency budget with retries on transient failures,
//! deduplicates the merged result by URL and stores it under a key.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_harvest::config::load_config;
//! use catalog_harvest::fetch::HttpPageFetcher;
//! use catalog_harvest::harvest::Harvester;
//! use catalog_harvest::http::HttpClient;
//! use catalog_harvest::output::ObjectStoreSink;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> catalog_harvest::Result<()> {
//!     let config = load_config("input.yaml")?;
//!     let client = HttpClient::new(config.http.client_config())?;
//!     let fetcher = HttpPageFetcher::new(client, config.source.clone());
//!     let sink = ObjectStoreSink::parse(&config.store)?;
//!
//!     let report = Harvester::new(Arc::new(fetcher))
//!         .harvest(config.page_size, config.max_concurrent_requests, &sink, &config.key)
//!         .await?;
//!     println!("stored {} items", report.stored_items);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Harvester                            │
//! │   probe count → plan pages → fan out → flatten → dedup → put │
//! └──────────────────────────────────────────────────────────────┘
//!          │                    │                         │
//! ┌────────┴───────┐  ┌─────────┴────────┐  ┌─────────────┴──────┐
//! │  PageFetcher   │  │ ConcurrencyPool  │  │     ItemSink       │
//! │  (fetch)       │  │ (pool)           │  │     (output)       │
//! ├────────────────┤  ├──────────────────┤  ├────────────────────┤
//! │ HttpClient     │  │ N workers        │  │ local / S3 / R2    │
//! │ RetryPolicy    │  │ shared queue     │  │ GCS / Azure        │
//! │ Rate limit     │  │ results channel  │  │                    │
//! └────────────────┘  └──────────────────┘  └────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Listing source and page fetching
pub mod fetch;

/// Bounded-concurrency task pool
pub mod pool;

/// Count-then-fan-out orchestration and deduplication
pub mod harvest;

/// Persistence sinks
pub mod output;

/// Input configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, FetchTarget, Result};
pub use types::Item;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
