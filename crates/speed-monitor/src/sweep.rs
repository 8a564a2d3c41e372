//! Periodic removal of expired cache entries

use geo_ttl_cache::GeoCache;
use nominatim_client::RoadInfo;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

/// Spawn a task that sweeps expired entries every `period` until `shutdown`
/// flips to `true` or its sender is dropped.
///
/// The first sweep runs one full period after spawning.
pub fn spawn_cleanup_task(
    cache: Arc<GeoCache<RoadInfo>>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(interval_secs = period.as_secs(), "Cache cleanup task started");

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Cache cleanup task shutting down");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let removed = cache.cleanup().await;
                    debug!(removed, "Cache cleanup pass finished");
                }
            }
        }
    })
}
