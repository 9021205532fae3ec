//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::DataCategory;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
///
/// Timestamps come from `tokio::time::Instant` so a paused test runtime
/// controls expiry the same way it controls retry delays.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Category the entry was stored under
    pub category: DataCategory,
    /// When the entry was stored
    pub stored_at: Instant,
    /// How long the entry stays valid
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stored at the current instant.
    pub fn new(value: V, category: DataCategory, ttl: Duration) -> Self {
        Self {
            value,
            category,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Expires At ==
    pub fn expires_at(&self) -> Instant {
        self.stored_at + self.ttl
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is valid only while `now < stored_at + ttl`, so a zero TTL
    /// entry is expired from the moment it is stored.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at()
    }

    // == Age ==
    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.stored_at)
    }

    // == Time To Live ==
    /// Returns remaining TTL, `Duration::ZERO` once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at()
            .saturating_duration_since(Instant::now())
    }
}
