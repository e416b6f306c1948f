//! Common types used throughout catalog-harvest
//!
//! This module contains shared type definitions and type aliases
//! used across multiple modules.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Item
// ============================================================================

/// One entry of the harvested listing.
///
/// `url` is the natural key: two items with the same `url` describe the
/// same entity regardless of the other fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Item {
    /// Display name
    pub name: String,
    /// Profile/detail page URL
    pub url: String,
    /// Logo URL
    pub icon: String,
}

impl Item {
    /// Create a new item
    pub fn new(name: impl Into<String>, url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    /// Deduplication key
    pub fn key(&self) -> &str {
        &self.url
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Backoff strategy for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Delay grows by the base delay on every retry
    #[default]
    Linear,
    /// Delay doubles on every retry
    Exponential,
}
