//! HTTP response bodies for the speed monitor

use chrono::{DateTime, Utc};
use geo_ttl_cache::CacheStats;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub uptime_secs: u64,
    pub timestamp: DateTime<Utc>,
}

/// Cache counters as exposed on the admin surface
#[derive(Debug, Serialize)]
pub struct CacheReport {
    pub total_requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub saves: u64,
    pub evictions: u64,
    pub entries: usize,
    /// Percentage, two decimals
    pub hit_rate: f64,
    /// Percentage, two decimals
    pub api_call_reduction: f64,
    pub ttl_hours: f64,
}

impl From<CacheStats> for CacheReport {
    fn from(stats: CacheStats) -> Self {
        Self {
            total_requests: stats.total,
            hits: stats.hits,
            misses: stats.misses,
            saves: stats.saves,
            evictions: stats.evictions,
            entries: stats.entries,
            hit_rate: percent(stats.hit_rate),
            api_call_reduction: percent(stats.api_call_reduction),
            ttl_hours: stats.ttl_secs as f64 / 3600.0,
        }
    }
}

fn percent(ratio: f64) -> f64 {
    (ratio * 10_000.0).round() / 100.0
}

#[derive(Debug, Serialize)]
pub struct FieldDescriptions {
    pub total_requests: &'static str,
    pub hits: &'static str,
    pub misses: &'static str,
    pub entries: &'static str,
    pub hit_rate: &'static str,
    pub api_call_reduction: &'static str,
}

pub const CACHE_FIELD_DESCRIPTIONS: FieldDescriptions = FieldDescriptions {
    total_requests: "Lookups processed",
    hits: "Lookups answered from the cache",
    misses: "Lookups that needed the geocoding service",
    entries: "Locations currently cached",
    hit_rate: "Percentage of lookups answered from the cache",
    api_call_reduction: "Percentage of geocoding calls avoided",
};

/// Cache statistics response
#[derive(Debug, Serialize)]
pub struct CacheStatsResponse {
    pub status: &'static str,
    pub cache: CacheReport,
    pub descriptions: FieldDescriptions,
    pub timestamp: DateTime<Utc>,
}

/// Result of a clear or cleanup request
#[derive(Debug, Serialize)]
pub struct CacheMaintenanceResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub entries_removed: usize,
    pub timestamp: DateTime<Utc>,
}
