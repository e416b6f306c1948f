//! Output module
//!
//! Persists the finished collection.
//!
//! # Overview
//!
//! - [`ItemSink`] is the key-value seam the harvester writes through
//! - [`ObjectStoreSink`] stores `<key>.json` locally or in cloud storage
//!   (S3, R2, GCS, Azure)

mod sink;
mod store;

pub use sink::ItemSink;
pub use store::ObjectStoreSink;
