//! Harvest types
//!
//! Page planning and the report returned after a stored run.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// How a listing of `total_items` is cut into fixed-size pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePlan {
    /// Items reported by the count probe
    pub total_items: u64,
    /// Items requested per page
    pub page_size: u64,
    /// `ceil(total_items / page_size)`
    pub page_count: u64,
    /// Start offset of every page
    pub offsets: Vec<u64>,
}

impl PagePlan {
    /// Plan the pages for a listing; `page_size` must be positive
    pub fn new(total_items: u64, page_size: u64) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }

        let page_count = total_items.div_ceil(page_size);
        let offsets = (0..page_count).map(|page| page * page_size).collect();

        Ok(Self {
            total_items,
            page_size,
            page_count,
            offsets,
        })
    }

    /// True when there is nothing to fetch
    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }
}

/// Outcome of a stored harvest
#[derive(Debug, Clone, Serialize)]
pub struct HarvestReport {
    /// Key the items were stored under
    pub key: String,
    /// Where the sink put them
    pub location: String,
    /// Items reported by the count probe
    pub total_items: u64,
    /// Pages fetched
    pub page_count: u64,
    /// Rows received across all pages
    pub fetched_items: usize,
    /// Items after deduplication
    pub stored_items: usize,
    /// Rows dropped as duplicates
    pub duplicates_removed: usize,
    /// When the count probe was issued
    pub started_at: DateTime<Utc>,
    /// When the sink write completed
    pub finished_at: DateTime<Utc>,
}

impl HarvestReport {
    /// Wall-clock duration of the run in milliseconds
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
