//! Bounded cache of filter results.

use std::collections::VecDeque;

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::query::DocSet;

type CacheKey = (String, u64);

/// Cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that missed.
    pub misses: u64,
    /// Entries dropped to respect the capacity.
    pub evictions: u64,
    /// Entries currently held.
    pub size: usize,
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: AHashMap<CacheKey, DocSet>,
    order: VecDeque<CacheKey>,
    stats: CacheStats,
}

/// Filter results keyed by filter cache key and index generation.
///
/// On a hit the filter is not evaluated at all, so filters must not rely
/// on evaluation for side effects that later stages read. Oldest entries
/// are evicted first. A capacity of zero disables caching.
#[derive(Debug)]
pub struct FilterCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl FilterCache {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        FilterCache {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Look up the result cached for `key` at `generation`.
    pub fn get(&self, key: &str, generation: u64) -> Option<DocSet> {
        let mut inner = self.inner.lock();
        let found = inner.entries.get(&(key.to_string(), generation)).cloned();
        if found.is_some() {
            inner.stats.hits += 1;
        } else {
            inner.stats.misses += 1;
        }
        found
    }

    /// Store a result.
    pub fn insert(&self, key: String, generation: u64, docs: DocSet) {
        if self.capacity == 0 {
            return;
        }
        let mut inner = self.inner.lock();
        let cache_key = (key, generation);
        if inner.entries.insert(cache_key.clone(), docs).is_none() {
            inner.order.push_back(cache_key);
        }
        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            inner.stats.evictions += 1;
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            size: inner.entries.len(),
            ..inner.stats
        }
    }
}
