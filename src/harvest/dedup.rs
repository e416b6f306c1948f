//! Last-write-wins deduplication
//!
//! A later duplicate replaces the earlier value in place: contents follow
//! the last occurrence, position follows the first.

use crate::types::Item;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Deduplicate `items` by `key`, keeping the last value at the first position
pub fn dedup_last_wins<T, K, F>(items: impl IntoIterator<Item = T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut positions: HashMap<K, usize> = HashMap::new();
    let mut unique = Vec::new();

    for item in items {
        match positions.entry(key(&item)) {
            Entry::Occupied(slot) => unique[*slot.get()] = item,
            Entry::Vacant(slot) => {
                slot.insert(unique.len());
                unique.push(item);
            }
        }
    }

    unique
}

/// Deduplicate items by their URL
pub fn dedup_by_url(items: impl IntoIterator<Item = Item>) -> Vec<Item> {
    dedup_last_wins(items, |item| item.key().to_string())
}
