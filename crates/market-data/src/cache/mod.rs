//! Process-local TTL cache.
//!
//! This module contains:
//! - The `RateCache` trait the aggregation service depends on
//! - `TtlCache`, the in-memory implementation shared across request handlers
//!
//! The cache is constructed once at process start and shared by reference;
//! swapping in a distributed store later only means implementing `RateCache`
//! on it. There is no background sweep: expired entries are dropped when a
//! read finds them, and the key count is unbounded.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::models::TokenRate;

/// Cache seam for aggregated token rate collections.
pub trait RateCache: Send + Sync {
    /// Returns the stored value if present and not yet expired.
    fn get(&self, key: &str) -> Option<Vec<TokenRate>>;

    /// Stores `value` under `key`, replacing any existing entry, with
    /// absolute expiry `now + ttl`. Always succeeds.
    fn put(&self, key: &str, value: Vec<TokenRate>, ttl: Duration);
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-memory key/value store with per-entry expiration.
///
/// Safe for concurrent `get`/`put` from multiple in-flight requests. Entries
/// are replaced wholesale on `put`; an expired entry is never returned and is
/// evicted lazily by the `get` that observes it.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if now < entry.expires_at => return Some(entry.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // The entry was expired at read time. Re-check under the write lock
        // before evicting: a concurrent put may have replaced it already.
        let mut entries = self.entries.write().unwrap();
        if let Some(entry) = entries.get(key) {
            if now >= entry.expires_at {
                entries.remove(key);
            }
        }
        None
    }

    pub fn put(&self, key: &str, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().unwrap().insert(key.to_string(), entry);
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl RateCache for TtlCache<Vec<TokenRate>> {
    fn get(&self, key: &str) -> Option<Vec<TokenRate>> {
        TtlCache::get(self, key)
    }

    fn put(&self, key: &str, value: Vec<TokenRate>, ttl: Duration) {
        TtlCache::put(self, key, value, ttl)
    }
}
