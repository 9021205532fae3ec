//! Cache Module
//!
//! Process-local response cache with per-category TTL, LRU capacity bound
//! and explicit invalidation.

mod entry;
mod key;
mod lru;
mod policy;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use lru::LruTracker;
pub use policy::{DataCategory, TtlContext, TtlPolicy};
pub use stats::{CacheInfo, CacheStats, CategoryInfo};
pub use store::{CacheStore, StaleRead};

/// A cache store shared between concurrent callers.
pub type SharedCache<V> = Arc<RwLock<CacheStore<V>>>;

// == Public Constants ==
/// Maximum allowed encoded key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;
