//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and
//! invalidations, plus a per-category snapshot of the store's contents.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;

use crate::cache::DataCategory;

// == Cache Stats ==
/// Tracks cache performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a valid entry
    pub hits: u64,
    /// Number of lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries dropped by LRU pressure or the expiry sweeper
    pub evictions: u64,
    /// Entries removed by explicit invalidation
    pub invalidations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_evictions(&mut self, count: usize) {
        self.evictions += count as u64;
    }

    pub fn record_invalidations(&mut self, count: usize) {
        self.invalidations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}

// == Cache Info ==
/// Point-in-time view of what the store currently holds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheInfo {
    pub total_entries: usize,
    /// Entries past their TTL that have not been swept yet
    pub expired_entries: usize,
    pub entries_by_category: BTreeMap<DataCategory, CategoryInfo>,
    pub oldest_entry_age: Option<Duration>,
    pub newest_entry_age: Option<Duration>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryInfo {
    pub count: usize,
    pub expired: usize,
}
