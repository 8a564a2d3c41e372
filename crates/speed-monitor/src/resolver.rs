//! Cache-first road resolution with graceful degradation

use async_trait::async_trait;
use geo_ttl_cache::GeoCache;
use nominatim_client::{NominatimClient, RoadInfo};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// External capability that maps coordinates to road details
#[async_trait]
pub trait RoadLookup: Send + Sync {
    async fn lookup(&self, latitude: f64, longitude: f64) -> nominatim_client::Result<RoadInfo>;
}

#[async_trait]
impl RoadLookup for NominatimClient {
    async fn lookup(&self, latitude: f64, longitude: f64) -> nominatim_client::Result<RoadInfo> {
        self.reverse_lookup(latitude, longitude).await
    }
}

/// Resolves road details for coordinates, preferring the shared cache.
///
/// Lookup failures never reach the caller: a still-fresh cached entry is
/// served if one exists, otherwise a conservative placeholder.
pub struct RoadResolver {
    cache: Arc<GeoCache<RoadInfo>>,
    lookup: Arc<dyn RoadLookup>,
    timeout: Duration,
}

impl RoadResolver {
    pub fn new(
        cache: Arc<GeoCache<RoadInfo>>,
        lookup: Arc<dyn RoadLookup>,
        timeout: Duration,
    ) -> Self {
        Self {
            cache,
            lookup,
            timeout,
        }
    }

    pub fn cache(&self) -> &Arc<GeoCache<RoadInfo>> {
        &self.cache
    }

    /// Resolve road details for a coordinate pair
    pub async fn resolve(&self, latitude: f64, longitude: f64) -> RoadInfo {
        if let Some(cached) = self.cache.get(latitude, longitude).await {
            return cached;
        }

        let outcome = tokio::time::timeout(self.timeout, self.lookup.lookup(latitude, longitude)).await;

        // Not-found carries no error text; every other failure does
        let failure = match outcome {
            Ok(Ok(road)) => {
                self.cache.put(latitude, longitude, road.clone()).await;
                return road;
            }
            Ok(Err(e)) if e.is_not_found() => {
                info!(lat = latitude, lon = longitude, "No road found at coordinates");
                None
            }
            Ok(Err(e)) => {
                warn!(lat = latitude, lon = longitude, error = %e, "Road lookup failed");
                Some(e.to_string())
            }
            Err(_) => {
                warn!(
                    lat = latitude,
                    lon = longitude,
                    timeout_secs = self.timeout.as_secs_f64(),
                    "Road lookup timed out"
                );
                Some(format!(
                    "Road lookup timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            }
        };

        // Another request may have cached this spot while the lookup ran
        if let Some(cached) = self.cache.peek(latitude, longitude).await {
            info!(lat = latitude, lon = longitude, "Serving cached road after failed lookup");
            return cached;
        }

        RoadInfo::unidentified(failure)
    }
}
