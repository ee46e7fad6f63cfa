//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(#[from] nearby_api::ApiError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] nearby_discovery::DiscoveryError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] nearby_telemetry::TelemetryError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session did not settle within {0}ms")]
    SettleTimeout(u64),
}

pub type AppResult<T> = Result<T, AppError>;
