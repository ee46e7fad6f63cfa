//! One-shot location acquisition.

use std::sync::Arc;
use std::time::Duration;

use nearby_core::LocationFix;
use tracing::{debug, info, warn};

use crate::error::{LocationError, LocationResult};
use crate::geolocation::{Geolocation, PermissionStatus};

/// Requests permission and reads a single position fix.
///
/// Each call to [`request_location`](Self::request_location) prompts for
/// permission again; a grant earlier in the session does not carry over.
#[derive(Clone)]
pub struct LocationProvider {
    geolocation: Arc<dyn Geolocation>,
    /// Upper bound on the position read. `None` leaves it to the device.
    fix_timeout: Option<Duration>,
}

impl LocationProvider {
    pub fn new(geolocation: Arc<dyn Geolocation>) -> Self {
        Self {
            geolocation,
            fix_timeout: None,
        }
    }

    #[must_use]
    pub fn with_fix_timeout(mut self, timeout: Duration) -> Self {
        self.fix_timeout = Some(timeout);
        self
    }

    /// Request permission, then read exactly one position fix.
    ///
    /// # Errors
    /// - [`LocationError::PermissionDenied`] if the prompt is refused. The
    ///   position is never read in that case.
    /// - [`LocationError::Unavailable`] if the device cannot produce a fix,
    ///   the read exceeds `fix_timeout`, or the fix is not a valid WGS-84
    ///   position.
    pub async fn request_location(&self) -> LocationResult<LocationFix> {
        debug!("Requesting foreground location permission");

        let status = self.geolocation.request_permission().await?;
        if status == PermissionStatus::Denied {
            warn!("Location permission denied");
            return Err(LocationError::PermissionDenied);
        }

        let read = self.geolocation.current_position();
        let fix = match self.fix_timeout {
            Some(limit) => tokio::time::timeout(limit, read).await.map_err(|_| {
                LocationError::Unavailable(format!(
                    "position read timed out after {}ms",
                    limit.as_millis()
                ))
            })??,
            None => read.await?,
        };

        let coordinate = fix
            .coordinate()
            .map_err(|e| LocationError::Unavailable(format!("device reported {e}")))?;

        info!(
            %coordinate,
            accuracy = ?fix.accuracy,
            "Location fix acquired"
        );

        Ok(fix)
    }
}

impl std::fmt::Debug for LocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationProvider")
            .field("fix_timeout", &self.fix_timeout)
            .finish_non_exhaustive()
    }
}
