//! Listing fetch module
//!
//! Turns `(offset, limit)` windows into typed [`Item`](crate::types::Item)s.
//!
//! # Overview
//!
//! - [`SourceConfig`] builds request bodies and reads responses
//! - [`PageFetcher`] is the seam the harvester depends on
//! - [`HttpPageFetcher`] implements it over the retrying [`HttpClient`](crate::http::HttpClient)
//!
//! A row missing a field is kept with that field empty; a response missing
//! the rows or the count fails the request.

mod fetcher;
mod source;

pub use fetcher::{HttpPageFetcher, PageFetcher};
pub use source::{FieldMapping, SourceConfig};

#[cfg(test)]
mod tests;
