//! Speed Monitor - vehicle telemetry broker
//!
//! Receives position and speed reports from vehicle units, resolves the road
//! speed limit through a cached Nominatim lookup and flags overspeed events.

mod config;
mod error;
mod resolver;
mod server;
mod sweep;
mod telemetry;
mod types;

use crate::config::Config;
use crate::error::Result;
use crate::resolver::RoadResolver;
use crate::server::{cors_layer, start_server, ServerState, SharedState};
use crate::sweep::spawn_cleanup_task;
use geo_ttl_cache::GeoCache;
use nominatim_client::{NominatimClient, RoadInfo};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("speed_monitor=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting Speed Monitor...");

    let config = Config::from_env();
    info!("Port: {}", config.port);
    info!("Nominatim: {}", config.nominatim_url);
    info!(
        "Cache cleanup interval: {} seconds",
        config.cleanup_interval.as_secs()
    );

    let cache = Arc::new(GeoCache::<RoadInfo>::new(config.cache_ttl));
    info!("Cache TTL: {} seconds", cache.ttl().as_secs());

    let geocoder = NominatimClient::with_config(
        &config.nominatim_url,
        &config.nominatim_user_agent,
        config.lookup_timeout,
        config.nominatim_min_interval,
    );
    let resolver = RoadResolver::new(cache.clone(), Arc::new(geocoder), config.lookup_timeout);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper = spawn_cleanup_task(cache, config.cleanup_interval, shutdown_rx);

    let state: SharedState = Arc::new(ServerState::new(resolver));

    // Serve until Ctrl-C
    let served = start_server(state, cors_layer(&config.cors_origins), config.port, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received");
    })
    .await;

    if shutdown_tx.send(true).is_err() {
        debug!("Cache cleanup task already stopped");
    }
    if let Err(e) = sweeper.await {
        warn!(error = %e, "Cache cleanup task ended abnormally");
    }

    served?;

    Ok(())
}
