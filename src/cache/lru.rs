//! LRU Tracker Module
//!
//! Least Recently Used ordering for capacity-based eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a monotonically increasing tick; the
/// smallest tick in `order` is the least recently used key. Touch, remove
/// and eviction are all O(log n).
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Key -> tick of its last touch
    ticks: HashMap<String, u64>,
    /// Tick -> key, oldest first
    order: BTreeMap<u64, String>,
    next_tick: u64,
}

impl LruTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        let tick = self.next_tick;
        self.next_tick += 1;

        if let Some(previous) = self.ticks.insert(key.to_string(), tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    pub fn peek_oldest(&self) -> Option<&str> {
        self.order.first_key_value().map(|(_, key)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.ticks.contains_key(key)
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.order.clear();
    }
}
