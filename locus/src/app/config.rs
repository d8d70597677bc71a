//! Runtime settings for a run.
//!
//! `AppConfig` collects everything that is not part of the search config
//! itself: where files live, how long requests may take and how hard to
//! retry.

use std::path::PathBuf;
use std::time::Duration;

use crate::provider::{
    RetryPolicy, DEFAULT_BATCH_DELAY, DEFAULT_DATASET, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT_SECS,
    MAX_BATCH_SIZE,
};

/// Default directory of per-category database files.
pub const DEFAULT_DATABASE_DIR: &str = "data/database";

/// Default cache directory.
pub const DEFAULT_CACHE_DIR: &str = "data/cache";

/// Default Mapbox token file.
pub const DEFAULT_TOKEN_PATH: &str = "data/tokens/mapbox.txt";

/// Default GeoJSON output file.
pub const DEFAULT_OUTPUT_PATH: &str = "results/area.geojson";

/// Default spacing between routing requests (Mapbox allows 300 per minute).
pub const DEFAULT_ROUTING_INTERVAL_MS: u64 = 200;

/// Elevation request settings.
#[derive(Clone, Debug, PartialEq)]
pub struct ElevationSettings {
    pub dataset: String,

    /// Locations per request, at most [`MAX_BATCH_SIZE`].
    pub batch_size: usize,

    /// Minimum delay between batch requests.
    pub batch_delay: Duration,
}

impl Default for ElevationSettings {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            batch_size: MAX_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_dir: PathBuf,
    pub cache_dir: PathBuf,
    pub token_path: PathBuf,
    pub output_path: PathBuf,

    /// Per-request HTTP timeout.
    pub http_timeout: Duration,

    /// Retry policy shared by both providers.
    pub retry_policy: RetryPolicy,

    /// Minimum spacing between routing requests.
    pub routing_interval: Duration,

    pub elevation: ElevationSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_dir: PathBuf::from(DEFAULT_DATABASE_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry_policy: RetryPolicy::exponential(DEFAULT_MAX_ATTEMPTS),
            routing_interval: Duration::from_millis(DEFAULT_ROUTING_INTERVAL_MS),
            elevation: ElevationSettings::default(),
        }
    }
}

impl AppConfig {
    pub fn with_database_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.database_dir = dir.into();
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    pub fn with_token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets the total attempts per request; 1 disables retries.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.retry_policy = if attempts <= 1 {
            RetryPolicy::None
        } else {
            RetryPolicy::exponential(attempts)
        };
        self
    }

    pub fn with_routing_interval(mut self, interval: Duration) -> Self {
        self.routing_interval = interval;
        self
    }

    pub fn with_elevation(mut self, elevation: ElevationSettings) -> Self {
        self.elevation = elevation;
        self
    }
}
