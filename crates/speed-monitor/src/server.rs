//! HTTP server for telemetry and cache administration endpoints

use crate::error::AppError;
use crate::resolver::RoadResolver;
use crate::telemetry::{evaluate, SpeedReport, TelemetryPayload};
use crate::types::{
    CacheMaintenanceResponse, CacheStatsResponse, HealthResponse, CACHE_FIELD_DESCRIPTIONS,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the HTTP server
pub struct ServerState {
    pub resolver: RoadResolver,
    pub started_at: DateTime<Utc>,
}

impl ServerState {
    pub fn new(resolver: RoadResolver) -> Self {
        Self {
            resolver,
            started_at: Utc::now(),
        }
    }
}

pub type SharedState = Arc<ServerState>;

/// Build the CORS layer from configured origins; `*` allows any origin
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
    }
}

/// Create the HTTP router
pub fn create_router(state: SharedState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/telemetry", post(post_telemetry))
        .route("/api/cache/stats", get(cache_stats))
        .route("/api/cache/clear", post(cache_clear))
        .route("/api/cache/cleanup", post(cache_cleanup))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server, returning once `shutdown` resolves
pub async fn start_server<F>(
    state: SharedState,
    cors: CorsLayer,
    port: u16,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let router = create_router(state, cors);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Service description
async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Speed Monitor",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/telemetry": "Report vehicle position and speed, returns the road speed limit",
            "GET /api/health": "Service status",
            "GET /api/cache/stats": "Cache statistics",
            "POST /api/cache/clear": "Remove every cached location",
            "POST /api/cache/cleanup": "Remove expired cached locations",
        }
    }))
}

/// Health check endpoint
async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let now = Utc::now();
    let uptime_secs = (now - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok",
        uptime_secs,
        timestamp: now,
    })
}

/// Evaluate a telemetry report against the road speed limit
async fn post_telemetry(
    State(state): State<SharedState>,
    payload: Result<Json<TelemetryPayload>, JsonRejection>,
) -> Result<Json<SpeedReport>, AppError> {
    // Malformed bodies get the same 400 shape as failed field checks
    let Json(payload) =
        payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let telemetry = payload.validate()?;

    let road = state
        .resolver
        .resolve(telemetry.latitude, telemetry.longitude)
        .await;
    let report = evaluate(&telemetry, &road);

    info!(
        vehicle_id = %telemetry.vehicle_id,
        road = %road.road_name,
        speed = telemetry.speed,
        speed_limit = road.speed_limit,
        alert = report.alert,
        "Processed telemetry"
    );

    Ok(Json(report))
}

/// Cache statistics
async fn cache_stats(State(state): State<SharedState>) -> Json<CacheStatsResponse> {
    let stats = state.resolver.cache().stats().await;

    Json(CacheStatsResponse {
        status: "ok",
        cache: stats.into(),
        descriptions: CACHE_FIELD_DESCRIPTIONS,
        timestamp: Utc::now(),
    })
}

/// Remove every cached entry
async fn cache_clear(State(state): State<SharedState>) -> Json<CacheMaintenanceResponse> {
    let removed = state.resolver.cache().clear().await;

    Json(CacheMaintenanceResponse {
        status: "ok",
        message: "Cache cleared",
        entries_removed: removed,
        timestamp: Utc::now(),
    })
}

/// Remove expired entries only
async fn cache_cleanup(State(state): State<SharedState>) -> Json<CacheMaintenanceResponse> {
    let removed = state.resolver.cache().cleanup().await;

    Json(CacheMaintenanceResponse {
        status: "ok",
        message: "Expired cache entries removed",
        entries_removed: removed,
        timestamp: Utc::now(),
    })
}

async fn not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Route not found",
            "message": format!("Route {} {} does not exist", method, uri),
        })),
    )
        .into_response()
}
