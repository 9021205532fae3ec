//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and lazy
//! TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::{
    CacheEntry, CacheInfo, CacheKey, CacheStats, DataCategory, LruTracker, MAX_KEY_LENGTH,
};
use crate::error::{Result, SleeperError};

// == Stale Read ==
/// Result of a read that ignores expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct StaleRead<V> {
    pub value: V,
    pub expired: bool,
    pub age: Duration,
}

// == Cache Store ==
/// Key-value storage with per-entry TTL and a capacity bound.
///
/// `get` treats an expired entry exactly like a missing one but leaves it in
/// place; it disappears when overwritten, invalidated, evicted or swept by
/// [`CacheStore::cleanup_expired`].
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: HashMap<String, CacheEntry<V>>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Put ==
    /// Stores a value, unconditionally replacing any existing entry for the
    /// key and resetting its stored time.
    ///
    /// When a new key arrives at capacity and the least recently used entry
    /// has expired, all expired entries are swept. Otherwise only the least
    /// recently used entry is evicted; other expired entries are left to
    /// [`CacheStore::cleanup_expired`].
    pub fn put(&mut self, key: &CacheKey, value: V, ttl: Duration) -> Result<()> {
        let raw = key.as_str();
        if raw.len() > MAX_KEY_LENGTH {
            return Err(SleeperError::InvalidRequest(format!(
                "Cache key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        let is_overwrite = self.entries.contains_key(raw);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            if self.oldest_is_expired() {
                self.cleanup_expired();
            } else if let Some(evicted) = self.lru.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_evictions(1);
                debug!(key = %evicted, "cache evicted least recently used entry");
            }
        }

        let entry = CacheEntry::new(value, key.category(), ttl);
        self.entries.insert(raw.to_string(), entry);
        self.lru.touch(raw);
        self.stats.set_total_entries(self.entries.len());

        debug!(key = %key, ttl_secs = ttl.as_secs(), "cache put");
        Ok(())
    }

    // == Get ==
    /// Returns a copy of the value if present and not expired.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key.as_str()) {
            Some(entry) if !entry.is_expired_at(now) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key.as_str());
                debug!(key = %key, "cache hit");
                Some(value)
            }
            Some(_) => {
                self.stats.record_miss();
                debug!(key = %key, "cache entry expired");
                None
            }
            None => {
                self.stats.record_miss();
                debug!(key = %key, "cache miss");
                None
            }
        }
    }

    // == Get Stale ==
    /// Reads an entry regardless of expiry. Does not touch statistics.
    pub fn get_stale(&self, key: &CacheKey) -> Option<StaleRead<V>> {
        self.entries.get(key.as_str()).map(|entry| StaleRead {
            value: entry.value.clone(),
            expired: entry.is_expired(),
            age: entry.age(),
        })
    }
}

impl<V> CacheStore<V> {
    fn oldest_is_expired(&self) -> bool {
        self.lru
            .peek_oldest()
            .and_then(|key| self.entries.get(key))
            .is_some_and(CacheEntry::is_expired)
    }

    // == Invalidate ==
    /// Removes one entry. Returns whether it existed.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        let removed = self.remove_raw(key.as_str());
        if removed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        self.drop_invalidated(doomed)
    }

    /// Removes every entry stored under `category`.
    pub fn invalidate_category(&mut self, category: DataCategory) -> usize {
        let doomed: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.category == category)
            .map(|(key, _)| key.clone())
            .collect();
        self.drop_invalidated(doomed)
    }

    // == Clear ==
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.stats.record_invalidations(count);
        self.stats.set_total_entries(0);
        count
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired.len();
        for key in expired {
            self.remove_raw(&key);
        }

        self.stats.record_evictions(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Info ==
    /// Snapshot of entry counts and ages per category.
    pub fn info(&self) -> CacheInfo {
        let now = Instant::now();
        let mut info = CacheInfo {
            total_entries: self.entries.len(),
            ..CacheInfo::default()
        };

        for entry in self.entries.values() {
            let expired = entry.is_expired_at(now);
            let slot = info.entries_by_category.entry(entry.category).or_default();
            slot.count += 1;
            if expired {
                slot.expired += 1;
                info.expired_entries += 1;
            }

            let age = now.saturating_duration_since(entry.stored_at);
            info.oldest_entry_age = Some(info.oldest_entry_age.map_or(age, |a| a.max(age)));
            info.newest_entry_age = Some(info.newest_entry_age.map_or(age, |a| a.min(age)));
        }

        info
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    fn remove_raw(&mut self, key: &str) -> bool {
        self.lru.remove(key);
        self.entries.remove(key).is_some()
    }

    fn drop_invalidated(&mut self, keys: Vec<String>) -> usize {
        let count = keys.len();
        for key in keys {
            self.remove_raw(&key);
        }
        if count > 0 {
            debug!(count, "cache entries invalidated");
        }
        self.stats.record_invalidations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }
}
