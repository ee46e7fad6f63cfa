//! Device geolocation capability.
//!
//! The trait mirrors what a mobile OS offers: an asynchronous permission
//! prompt and a one-shot position read. Implementations decide how those
//! map onto real hardware.

use std::time::Duration;

use chrono::Utc;
use nearby_core::{BoxFuture, LocationFix};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LocationError, LocationResult};

/// Outcome of a foreground permission prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    #[default]
    Granted,
    Denied,
}

impl PermissionStatus {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// Device geolocation capability.
///
/// Permission may be revoked at any time, so callers must ask on every
/// request rather than caching a prior grant.
pub trait Geolocation: Send + Sync {
    /// Prompt for foreground location permission.
    fn request_permission(&self) -> BoxFuture<'_, LocationResult<PermissionStatus>>;

    /// Read a single current position.
    fn current_position(&self) -> BoxFuture<'_, LocationResult<LocationFix>>;
}

/// Geolocation backed by configured values instead of hardware.
///
/// Used by the command-line session and by tests. `position = None`
/// behaves like a device with location services switched off.
#[derive(Debug, Clone)]
pub struct SimulatedGeolocation {
    permission: PermissionStatus,
    position: Option<(f64, f64)>,
    accuracy: Option<f64>,
    delay: Duration,
}

impl SimulatedGeolocation {
    /// A device that grants permission and reports `(latitude, longitude)`.
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: Some((latitude, longitude)),
            accuracy: None,
            delay: Duration::ZERO,
        }
    }

    /// A device whose user refuses the permission prompt.
    pub fn denied() -> Self {
        Self {
            permission: PermissionStatus::Denied,
            position: None,
            accuracy: None,
            delay: Duration::ZERO,
        }
    }

    /// A device that grants permission but has location services disabled.
    pub fn disabled() -> Self {
        Self {
            permission: PermissionStatus::Granted,
            position: None,
            accuracy: None,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_permission(mut self, permission: PermissionStatus) -> Self {
        self.permission = permission;
        self
    }

    #[must_use]
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Delay applied to the position read, simulating a cold GPS start.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Geolocation for SimulatedGeolocation {
    fn request_permission(&self) -> BoxFuture<'_, LocationResult<PermissionStatus>> {
        Box::pin(async move {
            debug!(permission = ?self.permission, "Simulated permission prompt");
            Ok(self.permission)
        })
    }

    fn current_position(&self) -> BoxFuture<'_, LocationResult<LocationFix>> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let (latitude, longitude) = self.position.ok_or_else(|| {
                LocationError::Unavailable("location services are disabled".to_string())
            })?;

            let mut fix = LocationFix::new(latitude, longitude, Utc::now());
            fix.accuracy = self.accuracy;
            Ok(fix)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulated_granted_reports_position() {
        let geo = SimulatedGeolocation::at(-23.56, -46.65).with_accuracy(5.0);

        assert_eq!(
            geo.request_permission().await.unwrap(),
            PermissionStatus::Granted
        );

        let fix = geo.current_position().await.unwrap();
        assert_eq!(fix.latitude, -23.56);
        assert_eq!(fix.longitude, -46.65);
        assert_eq!(fix.accuracy, Some(5.0));
    }

    #[tokio::test]
    async fn test_simulated_disabled_is_unavailable() {
        let geo = SimulatedGeolocation::disabled();
        let err = geo.current_position().await.unwrap_err();
        assert!(matches!(err, LocationError::Unavailable(_)));
    }

    #[test]
    fn test_permission_status_default_is_granted() {
        assert!(PermissionStatus::default().is_granted());
        assert!(!PermissionStatus::Denied.is_granted());
    }
}
