//! Device location acquisition for nearby discovery.
//!
//! Wraps a device geolocation capability behind the [`Geolocation`] trait
//! and exposes a single operation, [`LocationProvider::request_location`]:
//! request foreground permission, then read exactly one position fix.
//!
//! Permission denial and OS faults are returned as [`LocationError`]
//! values; nothing here retries or synthesizes a fallback position.

pub mod error;
pub mod geolocation;
pub mod provider;

pub use error::{LocationError, LocationResult};
pub use geolocation::{Geolocation, PermissionStatus, SimulatedGeolocation};
pub use provider::LocationProvider;
