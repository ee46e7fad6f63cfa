//! Error types for nearby-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Empty {0} identifier")]
    EmptyId(&'static str),

    #[error("Invalid latitude: {0}")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0}")]
    InvalidLongitude(f64),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
