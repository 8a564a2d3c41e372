use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::error::NominatimError;
use crate::road_class::{describe_road_class, speed_limit_for};
use crate::types::{NominatimResponse, RoadInfo, UNIDENTIFIED_ROAD};

const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "speed-monitor/0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Nominatim's public instance allows at most 1 request per second
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(1100);
/// Highway class assumed when Nominatim does not report one
const DEFAULT_ROAD_CLASS: &str = "residential";

/// Nominatim reverse geocoding client that resolves coordinates to a road
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
    min_interval: Duration,
    /// When the last request was sent; held across the wait to serialize callers
    last_request: Mutex<Option<Instant>>,
}

impl NominatimClient {
    /// Create a new client with default settings
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a new client with a custom Nominatim URL
    pub fn with_base_url(base_url: &str) -> Self {
        Self::with_config(
            base_url,
            DEFAULT_USER_AGENT,
            DEFAULT_TIMEOUT,
            DEFAULT_MIN_INTERVAL,
        )
    }

    /// Create a new client with explicit URL, user agent, request timeout and
    /// minimum spacing between requests
    pub fn with_config(
        base_url: &str,
        user_agent: &str,
        timeout: Duration,
        min_interval: Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Resolve the road nearest to a coordinate pair
    pub async fn reverse_lookup(&self, latitude: f64, longitude: f64) -> crate::Result<RoadInfo> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(NominatimError::InvalidCoordinates(latitude, longitude));
        }

        self.throttle().await;

        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1",
            self.base_url, latitude, longitude
        );

        debug!(lat = latitude, lon = longitude, "Querying Nominatim");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NominatimError::ApiError(format!(
                "Nominatim returned status {}",
                response.status()
            )));
        }

        let data: NominatimResponse = response.json().await?;

        if let Some(ref err) = data.error {
            warn!(lat = latitude, lon = longitude, error = %err, "Nominatim returned error");
            return Err(NominatimError::NotFound);
        }

        let result = parse_nominatim_response(&data).ok_or(NominatimError::NotFound)?;

        debug!(
            lat = latitude,
            lon = longitude,
            road = %result.road_name,
            road_class = %result.road_class,
            speed_limit = result.speed_limit,
            "Resolved road"
        );

        Ok(result)
    }

    /// Wait until `min_interval` has passed since the previous request.
    ///
    /// The lock is held across the sleep so concurrent callers queue in
    /// order; the wait counts against any timeout the caller wraps around
    /// [`NominatimClient::reverse_lookup`].
    async fn throttle(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.min_interval).await;
        }
        *last = Some(Instant::now());
    }
}

impl Default for NominatimClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a Nominatim response into road details, `None` when it has no address
fn parse_nominatim_response(data: &NominatimResponse) -> Option<RoadInfo> {
    let addr = data.address.as_ref()?;

    // Road name - try road, then highway, then suburb, then neighbourhood
    let road_name = non_empty(&addr.road)
        .or_else(|| non_empty(&addr.highway))
        .or_else(|| non_empty(&addr.suburb))
        .or_else(|| non_empty(&addr.neighbourhood))
        .unwrap_or_else(|| UNIDENTIFIED_ROAD.to_string());

    let road_class = non_empty(&data.osm_type).unwrap_or_else(|| DEFAULT_ROAD_CLASS.to_string());

    Some(RoadInfo {
        road_name,
        speed_limit: speed_limit_for(&road_class),
        found: true,
        road_class_description: describe_road_class(&road_class).to_string(),
        road_class,
        city: non_empty(&addr.city)
            .or_else(|| non_empty(&addr.town))
            .or_else(|| non_empty(&addr.village)),
        state: non_empty(&addr.state),
        country: non_empty(&addr.country),
        error: None,
    })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::{json, Value};

    fn parse(value: Value) -> Option<RoadInfo> {
        let data: NominatimResponse = serde_json::from_value(value).unwrap();
        parse_nominatim_response(&data)
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn test_client(base_url: &str, timeout: Duration) -> NominatimClient {
        NominatimClient::with_config(base_url, "speed-monitor-test", timeout, Duration::ZERO)
    }

    #[test]
    fn test_parse_primary_road() {
        let info = parse(json!({
            "type": "primary",
            "address": {
                "road": "Avenida Paulista",
                "city": "São Paulo",
                "state": "São Paulo",
                "country": "Brasil"
            }
        }))
        .unwrap();

        assert_eq!(info.road_name, "Avenida Paulista");
        assert_eq!(info.speed_limit, 80);
        assert_eq!(info.road_class, "primary");
        assert_eq!(info.road_class_description, "Primary Road");
        assert_eq!(info.city.as_deref(), Some("São Paulo"));
        assert_eq!(info.country.as_deref(), Some("Brasil"));
        assert!(info.found);
        assert!(info.error.is_none());
    }

    #[test]
    fn test_parse_name_and_city_fallbacks() {
        let info = parse(json!({
            "address": {
                "road": "",
                "suburb": "Pinheiros",
                "town": "Osasco",
                "state": ""
            }
        }))
        .unwrap();

        assert_eq!(info.road_name, "Pinheiros");
        assert_eq!(info.road_class, "residential");
        assert_eq!(info.speed_limit, 40);
        assert_eq!(info.city.as_deref(), Some("Osasco"));
        assert!(info.state.is_none());
    }

    #[test]
    fn test_parse_without_name() {
        let info = parse(json!({ "type": "motorway", "address": { "country": "Brasil" } })).unwrap();
        assert_eq!(info.road_name, "unidentified");
        assert_eq!(info.speed_limit, 110);
        assert!(info.found);
    }

    #[test]
    fn test_parse_without_address() {
        assert!(parse(json!({ "type": "primary" })).is_none());
    }

    #[tokio::test]
    async fn test_reverse_lookup_success() {
        let router = Router::new().route(
            "/reverse",
            get(|| async {
                Json(json!({
                    "type": "secondary",
                    "address": { "road": "Rua Augusta", "city": "São Paulo" }
                }))
            }),
        );
        let base_url = spawn_stub(router).await;
        let client = test_client(&base_url, Duration::from_secs(5));

        let info = client.reverse_lookup(-23.5553, -46.6566).await.unwrap();
        assert_eq!(info.road_name, "Rua Augusta");
        assert_eq!(info.speed_limit, 60);
    }

    #[tokio::test]
    async fn test_reverse_lookup_not_found() {
        let router = Router::new().route(
            "/reverse",
            get(|| async { Json(json!({ "error": "Unable to geocode" })) }),
        );
        let base_url = spawn_stub(router).await;
        let client = test_client(&base_url, Duration::from_secs(5));

        let err = client.reverse_lookup(0.0, 0.0).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_reverse_lookup_server_error() {
        let router = Router::new().route(
            "/reverse",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base_url = spawn_stub(router).await;
        let client = test_client(&base_url, Duration::from_secs(5));

        let err = client.reverse_lookup(1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, NominatimError::ApiError(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_reverse_lookup_timeout() {
        let router = Router::new().route(
            "/reverse",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let base_url = spawn_stub(router).await;
        let client = test_client(&base_url, Duration::from_millis(100));

        let err = client.reverse_lookup(1.0, 1.0).await.unwrap_err();
        assert!(matches!(err, NominatimError::Http(_)));
    }

    #[tokio::test]
    async fn test_invalid_coordinates_rejected() {
        let client = test_client("http://127.0.0.1:9", Duration::from_secs(1));
        let err = client.reverse_lookup(91.0, 0.0).await.unwrap_err();
        assert!(matches!(err, NominatimError::InvalidCoordinates(_, _)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_spaces_requests() {
        let client = NominatimClient::with_config(
            "http://127.0.0.1:9",
            "speed-monitor-test",
            Duration::from_secs(1),
            Duration::from_secs(2),
        );

        let start = Instant::now();
        client.throttle().await;
        client.throttle().await;
        client.throttle().await;
        assert!(Instant::now() - start >= Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_throttle_queues_callers() {
        let client = NominatimClient::with_config(
            "http://127.0.0.1:9",
            "speed-monitor-test",
            Duration::from_secs(1),
            Duration::from_secs(2),
        );

        let client = &client;
        let start = Instant::now();
        let timed = || async move {
            client.throttle().await;
            Instant::now() - start
        };
        let (a, b, c) = tokio::join!(timed(), timed(), timed());

        let mut waits = [a, b, c];
        waits.sort();
        assert_eq!(waits[0], Duration::ZERO);
        assert!(waits[1] >= Duration::from_secs(2));
        assert!(waits[2] >= Duration::from_secs(4));
    }
}
