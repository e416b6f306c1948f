//! Persistence sink trait

use crate::error::Result;
use crate::types::Item;
use async_trait::async_trait;

/// Durable key-value destination for a finished harvest.
///
/// The harvester calls [`put`](ItemSink::put) once per successful run and
/// never for a failed one.
#[async_trait]
pub trait ItemSink: Send + Sync {
    /// Store `items` under `key`, replacing any previous value, and return
    /// a human-readable location
    async fn put(&self, key: &str, items: &[Item]) -> Result<String>;
}
