//! Page fetcher trait and its HTTP implementation

use super::source::SourceConfig;
use crate::error::{Error, FetchTarget, Result};
use crate::http::HttpClient;
use crate::types::Item;
use async_trait::async_trait;
use tracing::{debug, warn};

/// Source of listing pages.
///
/// Implementations report every failure as [`Error::Fetch`] tagged with the
/// request that failed.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Total number of items in the listing
    async fn probe_count(&self) -> Result<u64>;

    /// Items in the window starting at `offset`
    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<Item>>;
}

/// [`PageFetcher`] that POSTs to a [`SourceConfig`] endpoint
#[derive(Debug)]
pub struct HttpPageFetcher {
    client: HttpClient,
    source: SourceConfig,
}

impl HttpPageFetcher {
    /// Create a fetcher for `source` using `client` as transport
    pub fn new(client: HttpClient, source: SourceConfig) -> Self {
        Self { client, source }
    }

    /// The source this fetcher reads
    pub fn source(&self) -> &SourceConfig {
        &self.source
    }

    async fn post(&self, offset: u64, limit: u64) -> Result<serde_json::Value> {
        let body = self.source.request_body(offset, limit);
        self.client
            .post_json(&self.source.endpoint, &self.source.headers, &body)
            .await
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn probe_count(&self) -> Result<u64> {
        let response = self
            .post(0, 1)
            .await
            .map_err(|e| Error::fetch(FetchTarget::Stats, e))?;

        self.source
            .read_count(&response)
            .map_err(|e| Error::fetch(FetchTarget::Stats, e))
    }

    async fn fetch_page(&self, offset: u64, limit: u64) -> Result<Vec<Item>> {
        let target = FetchTarget::Page { offset };
        let response = self
            .post(offset, limit)
            .await
            .map_err(|e| Error::fetch(target, e))?;

        let (items, degraded) = self
            .source
            .read_items(&response)
            .map_err(|e| Error::fetch(target, e))?;

        if degraded > 0 {
            warn!(
                "Page at offset {}: {} of {} rows had missing fields, left empty",
                offset,
                degraded,
                items.len()
            );
        }
        debug!("Page at offset {}: fetched {} items", offset, items.len());

        Ok(items)
    }
}
