//! Harvest orchestration
//!
//! Count, plan, fan out, merge, deduplicate, store.
//!
//! # Overview
//!
//! 1. Probe the total item count
//! 2. Cut it into pages of `page_size`
//! 3. Fetch every page through a [`ConcurrencyPool`]
//! 4. Flatten in settlement order and deduplicate by URL
//! 5. Hand the result to an [`ItemSink`] exactly once
//!
//! Any failure aborts the whole run before the sink is touched. Retries
//! only happen inside the transport.

mod dedup;
mod types;

pub use dedup::{dedup_by_url, dedup_last_wins};
pub use types::{HarvestReport, PagePlan};

use crate::error::{Error, Result};
use crate::fetch::PageFetcher;
use crate::output::ItemSink;
use crate::pool::{ConcurrencyPool, Task};
use crate::types::Item;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// Items produced by one run, before storage
#[derive(Debug, Clone)]
pub struct Collected {
    /// The page plan that was executed
    pub plan: PagePlan,
    /// Rows received across all pages
    pub fetched: usize,
    /// Deduplicated items
    pub items: Vec<Item>,
}

/// Drives a [`PageFetcher`] over a whole listing
#[derive(Clone)]
pub struct Harvester {
    fetcher: Arc<dyn PageFetcher>,
}

impl Harvester {
    /// Create a harvester over `fetcher`
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Probe the listing and plan its pages without fetching them
    pub async fn plan(&self, page_size: u64) -> Result<PagePlan> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        let total_items = self.fetcher.probe_count().await?;
        let plan = PagePlan::new(total_items, page_size)?;
        info!(
            "Total items: {}, total pages: {}",
            plan.total_items, plan.page_count
        );
        Ok(plan)
    }

    /// Fetch every page and return the deduplicated items
    pub async fn run(&self, page_size: u64, concurrency: usize) -> Result<Vec<Item>> {
        Ok(self.collect(page_size, concurrency).await?.items)
    }

    /// Fetch every page, keeping the plan and row counts alongside the items
    pub async fn collect(&self, page_size: u64, concurrency: usize) -> Result<Collected> {
        let pool = ConcurrencyPool::new(concurrency)?;
        let plan = self.plan(page_size).await?;

        if plan.is_empty() {
            return Ok(Collected {
                plan,
                fetched: 0,
                items: Vec::new(),
            });
        }

        let tasks: Vec<Task<Vec<Item>>> = plan
            .offsets
            .iter()
            .map(|&offset| {
                let fetcher = Arc::clone(&self.fetcher);
                Task::new(move || async move { fetcher.fetch_page(offset, page_size).await })
            })
            .collect();

        debug!(
            "Submitting {} page tasks with concurrency {}",
            tasks.len(),
            pool.limit()
        );
        let pages = pool.run_all(tasks).await?;

        let merged: Vec<Item> = pages.into_iter().flatten().collect();
        let fetched = merged.len();
        let items = dedup_by_url(merged);
        info!("Fetched {} items, {} unique", fetched, items.len());

        Ok(Collected {
            plan,
            fetched,
            items,
        })
    }

    /// Run the harvest and store the result under `key`
    pub async fn harvest(
        &self,
        page_size: u64,
        concurrency: usize,
        sink: &dyn ItemSink,
        key: &str,
    ) -> Result<HarvestReport> {
        let started_at = Utc::now();
        let collected = self.collect(page_size, concurrency).await?;

        let location = sink.put(key, &collected.items).await?;
        info!("Stored {} items at {}", collected.items.len(), location);

        Ok(HarvestReport {
            key: key.to_string(),
            location,
            total_items: collected.plan.total_items,
            page_count: collected.plan.page_count,
            fetched_items: collected.fetched,
            stored_items: collected.items.len(),
            duplicates_removed: collected.fetched - collected.items.len(),
            started_at,
            finished_at: Utc::now(),
        })
    }
}

impl std::fmt::Debug for Harvester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Harvester").finish_non_exhaustive()
    }
}
