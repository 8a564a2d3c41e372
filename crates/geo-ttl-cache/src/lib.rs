//! Coordinate-keyed TTL cache
//!
//! Stores lookup results keyed by latitude/longitude rounded to 5 decimal
//! places, expires entries lazily on read and through an explicit sweep, and
//! keeps hit/miss/eviction counters that can be read as a consistent snapshot.

mod cache;
mod key;
mod types;

pub use cache::{GeoCache, DEFAULT_TTL};
pub use key::{CacheKey, KEY_PRECISION};
pub use types::{CacheEntry, CacheStats};
