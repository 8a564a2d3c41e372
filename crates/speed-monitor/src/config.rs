use std::env;
use std::time::Duration;

/// Service configuration parsed from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub nominatim_url: String,
    pub nominatim_user_agent: String,
    /// Minimum spacing between Nominatim requests
    pub nominatim_min_interval: Duration,
    /// Upper bound on a single road lookup, including throttling
    pub lookup_timeout: Duration,
    pub cache_ttl: Duration,
    pub cleanup_interval: Duration,
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            nominatim_user_agent: "speed-monitor/0.1".to_string(),
            nominatim_min_interval: Duration::from_millis(1100),
            lookup_timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
            cleanup_interval: Duration::from_secs(60 * 60), // 1 hour
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Parse configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary variable source, falling back to
    /// defaults for anything missing or unparseable
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = var("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        let nominatim_url = var("NOMINATIM_URL").unwrap_or(defaults.nominatim_url);

        let nominatim_user_agent =
            var("NOMINATIM_USER_AGENT").unwrap_or(defaults.nominatim_user_agent);

        let nominatim_min_interval = var("NOMINATIM_MIN_INTERVAL_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.nominatim_min_interval);

        let lookup_timeout = secs_var(&var, "LOOKUP_TIMEOUT_SECS").unwrap_or(defaults.lookup_timeout);
        let cache_ttl = secs_var(&var, "CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl);
        let cleanup_interval =
            secs_var(&var, "CACHE_CLEANUP_INTERVAL_SECS").unwrap_or(defaults.cleanup_interval);

        let cors_origins = var("CORS_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.cors_origins);

        Self {
            port,
            nominatim_url,
            nominatim_user_agent,
            nominatim_min_interval,
            lookup_timeout,
            cache_ttl,
            cleanup_interval,
            cors_origins,
        }
    }
}

/// Positive whole-second durations only; zero would disable expiry or spin the sweep
fn secs_var<F>(var: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .and_then(|s| s.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}
