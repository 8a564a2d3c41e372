use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// A cached value together with the instant it was written
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, inserted_at: Instant) -> Self {
        Self { value, inserted_at }
    }

    /// Time elapsed since the entry was written
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    /// An entry is stale once its age is strictly greater than the TTL
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.age(now) > ttl
    }
}

/// Point-in-time snapshot of cache counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    pub total: u64,
    pub hits: u64,
    pub misses: u64,
    pub saves: u64,
    pub evictions: u64,
    pub entries: usize,
    /// `hits / total`, 0 when nothing was read yet
    pub hit_rate: f64,
    /// `1 - misses / total`, 0 when nothing was read yet
    pub api_call_reduction: f64,
    pub ttl_secs: u64,
}

/// Running counters, only ever mutated under the cache lock
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub(crate) total: u64,
    pub(crate) hits: u64,
    pub(crate) misses: u64,
    pub(crate) saves: u64,
    pub(crate) evictions: u64,
}

impl Counters {
    pub(crate) fn snapshot(&self, entries: usize, ttl: Duration) -> CacheStats {
        let (hit_rate, api_call_reduction) = if self.total > 0 {
            let total = self.total as f64;
            (
                self.hits as f64 / total,
                1.0 - self.misses as f64 / total,
            )
        } else {
            (0.0, 0.0)
        };

        CacheStats {
            total: self.total,
            hits: self.hits,
            misses: self.misses,
            saves: self.saves,
            evictions: self.evictions,
            entries,
            hit_rate,
            api_call_reduction,
            ttl_secs: ttl.as_secs(),
        }
    }
}
