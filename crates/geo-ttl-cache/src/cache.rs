//! Shared cache store guarded by a single lock

use crate::key::CacheKey;
use crate::types::{CacheEntry, CacheStats, Counters};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

/// Default time-to-live for cached entries (24 hours)
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CacheState<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    counters: Counters,
}

/// Coordinate-keyed cache with lazy TTL expiration and an explicit sweep.
///
/// Entries and counters share one lock, so [`GeoCache::stats`] never observes
/// a half-applied update. `clear` drops entries but leaves counters intact;
/// there is no way to reset counters short of building a new cache.
pub struct GeoCache<V> {
    state: Mutex<CacheState<V>>,
    ttl: Duration,
}

impl<V: Clone> GeoCache<V> {
    /// Create an empty cache with the given TTL
    pub fn new(ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                counters: Counters::default(),
            }),
            ttl,
        }
    }

    /// Configured time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read the entry for a coordinate pair.
    ///
    /// Every call counts as a read. An entry older than the TTL is removed and
    /// reported as a miss.
    pub async fn get(&self, latitude: f64, longitude: f64) -> Option<V> {
        let key = CacheKey::from_coords(latitude, longitude);
        let now = Instant::now();

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.counters.total += 1;

        let Some(entry) = state.entries.get(&key) else {
            state.counters.misses += 1;
            debug!(key = %key, "Cache miss");
            return None;
        };

        let age = entry.age(now);
        if age > self.ttl {
            state.entries.remove(&key);
            state.counters.evictions += 1;
            state.counters.misses += 1;
            debug!(key = %key, age_secs = age.as_secs(), "Cache entry expired");
            return None;
        }

        state.counters.hits += 1;
        debug!(key = %key, age_secs = age.as_secs(), "Cache hit");
        Some(entry.value.clone())
    }

    /// Read a fresh entry without touching counters or evicting anything
    pub async fn peek(&self, latitude: f64, longitude: f64) -> Option<V> {
        let key = CacheKey::from_coords(latitude, longitude);
        let now = Instant::now();

        let state = self.state.lock().await;
        state
            .entries
            .get(&key)
            .filter(|entry| !entry.is_expired(now, self.ttl))
            .map(|entry| entry.value.clone())
    }

    /// Store a value, replacing whatever was cached for the same key
    pub async fn put(&self, latitude: f64, longitude: f64, value: V) {
        let key = CacheKey::from_coords(latitude, longitude);
        let entry = CacheEntry::new(value, Instant::now());

        let mut state = self.state.lock().await;
        state.counters.saves += 1;
        debug!(key = %key, "Cached value");
        state.entries.insert(key, entry);
    }

    /// Remove every expired entry, returning how many were dropped
    pub async fn cleanup(&self) -> usize {
        let now = Instant::now();
        let ttl = self.ttl;

        let mut state = self.state.lock().await;
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now, ttl));
        let removed = before - state.entries.len();
        state.counters.evictions += removed as u64;

        if removed > 0 {
            info!(removed, remaining = state.entries.len(), "Removed expired cache entries");
        }

        removed
    }

    /// Drop all entries regardless of age, returning the previous size
    pub async fn clear(&self) -> usize {
        let mut state = self.state.lock().await;
        let size = state.entries.len();
        state.entries.clear();
        info!(removed = size, "Cache cleared");
        size
    }

    /// Snapshot of counters and current size
    pub async fn stats(&self) -> CacheStats {
        let state = self.state.lock().await;
        state.counters.snapshot(state.entries.len(), self.ttl)
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<V: Clone> Default for GeoCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
