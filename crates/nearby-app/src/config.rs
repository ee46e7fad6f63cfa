//! Application configuration.

use crate::error::{AppError, AppResult};
use nearby_discovery::MapSpan;
use nearby_location::{PermissionStatus, SimulatedGeolocation};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable consulted when `--config` is not given.
pub const CONFIG_ENV: &str = "NEARBY_CONFIG";

/// Fallback configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Discovery service connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Service root, e.g. "http://192.168.0.10:3333".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Whole-request timeout (ms). Default: 10,000.
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_api_timeout_ms() -> u64 {
    10_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_api_timeout_ms(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Simulated device location.
///
/// A command-line session has no GPS; this stands in for the device's
/// permission prompt and position read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Answer to the permission prompt. Default: granted.
    #[serde(default)]
    pub permission: PermissionStatus,
    /// Reported latitude. Leaving either coordinate unset simulates a
    /// device with location services disabled.
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Reported horizontal accuracy (m).
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Simulated time to first fix (ms). Default: 0.
    #[serde(default)]
    pub delay_ms: u64,
    /// Upper bound on the position read (ms). 0 disables. Default: 15,000.
    #[serde(default = "default_fix_timeout_ms")]
    pub fix_timeout_ms: u64,
}

fn default_fix_timeout_ms() -> u64 {
    15_000
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            latitude: None,
            longitude: None,
            accuracy: None,
            delay_ms: 0,
            fix_timeout_ms: default_fix_timeout_ms(),
        }
    }
}

impl LocationConfig {
    /// Build the simulated device described by this section.
    pub fn geolocation(&self) -> SimulatedGeolocation {
        let mut geo = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => SimulatedGeolocation::at(latitude, longitude),
            _ => SimulatedGeolocation::disabled(),
        };
        geo = geo
            .with_permission(self.permission)
            .with_delay(Duration::from_millis(self.delay_ms));
        if let Some(accuracy) = self.accuracy {
            geo = geo.with_accuracy(accuracy);
        }
        geo
    }

    pub fn fix_timeout(&self) -> Option<Duration> {
        (self.fix_timeout_ms > 0).then(|| Duration::from_millis(self.fix_timeout_ms))
    }
}

/// Session runner settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// How long to wait for in-flight requests to finish (ms). Default: 15,000.
    #[serde(default = "default_settle_timeout_ms")]
    pub settle_timeout_ms: u64,
}

fn default_settle_timeout_ms() -> u64 {
    15_000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_timeout_ms: default_settle_timeout_ms(),
        }
    }
}

impl SessionConfig {
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub map: MapSpan,
    #[serde(default)]
    pub session: SessionConfig,
}

impl AppConfig {
    /// Resolve the config path: explicit argument, then `NEARBY_CONFIG`,
    /// then [`DEFAULT_CONFIG_PATH`].
    pub fn resolve_path(explicit: Option<String>) -> String {
        explicit
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load(path: &str) -> AppResult<Self> {
        if Path::new(path).exists() {
            Self::from_file(path)
        } else {
            tracing::warn!(path, "Config file not found, using defaults");
            let config = Self::default();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load from a specific file.
    pub fn from_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config: {e}")))?;

        Self::from_toml(&content)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(content: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(AppError::Config("api.base_url must not be empty".to_string()));
        }
        if self.api.timeout_ms == 0 {
            return Err(AppError::Config("api.timeout_ms must be positive".to_string()));
        }
        if self.location.latitude.is_some() != self.location.longitude.is_some() {
            return Err(AppError::Config(
                "location.latitude and location.longitude must be set together".to_string(),
            ));
        }
        if let Some(accuracy) = self.location.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(AppError::Config(format!(
                    "location.accuracy must be a non-negative number, got {accuracy}"
                )));
            }
        }
        let span_ok = |delta: f64| delta.is_finite() && delta > 0.0;
        if !span_ok(self.map.latitude_delta) || !span_ok(self.map.longitude_delta) {
            return Err(AppError::Config(
                "map span deltas must be positive".to_string(),
            ));
        }
        if self.session.settle_timeout_ms == 0 {
            return Err(AppError::Config(
                "session.settle_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
