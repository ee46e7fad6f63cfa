//! Location error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    /// The user refused (or revoked) foreground location permission.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The device could not produce a fix (GPS disabled, timeout, OS fault).
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

impl LocationError {
    /// Short label for metrics.
    pub fn outcome_label(&self) -> &'static str {
        match self {
            LocationError::PermissionDenied => "permission_denied",
            LocationError::Unavailable(_) => "unavailable",
        }
    }
}

pub type LocationResult<T> = Result<T, LocationError>;
