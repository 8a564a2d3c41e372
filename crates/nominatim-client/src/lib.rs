//! Nominatim Reverse Geocoding Client
//!
//! A Rust client for the [Nominatim](https://nominatim.org/) reverse geocoding API
//! that resolves a coordinate pair to the nearest road and infers its speed
//! limit from the OSM highway class. Requests are throttled to respect the
//! public instance's usage policy (1 req/sec).

mod client;
mod error;
mod road_class;
mod types;

pub use client::NominatimClient;
pub use error::{NominatimError, Result};
pub use road_class::{describe_road_class, speed_limit_for, DEFAULT_SPEED_LIMIT};
pub use types::RoadInfo;
