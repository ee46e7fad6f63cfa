//! Location-aware, category-filtered discovery.
//!
//! The [`DiscoveryController`](controller) is an actor that owns the screen's
//! [`ViewState`]. On spawn it requests the device location and loads the
//! category taxonomy concurrently; the first category is auto-selected,
//! and every selection change re-fetches the place list.
//!
//! # Ordering
//!
//! Each resource (location, categories, places) tags its requests with a
//! [`Ticket`]. Only the response to the most recently issued request is
//! applied; responses to superseded requests are dropped, so rapid
//! re-selection can never leave stale places on screen.
//!
//! # Rendering
//!
//! Consumers never mutate state. They subscribe to snapshots, derive a
//! [`Screen`] with [`ViewState::screen`], and hand it to the external
//! [`MapPresenter`] and [`CategoryPicker`] collaborators. User actions flow
//! back through [`DiscoveryHandle`].

pub mod collaborators;
pub mod controller;
pub mod error;
pub mod generation;
pub mod state;

#[cfg(test)]
mod mock;

pub use collaborators::{
    drive_screen, render_screen, Alert, AlertKind, CategoryPicker, LogNotifier, MapPresenter,
    Navigator, Notifier,
};
pub use controller::{spawn_discovery, DiscoveryConfig, DiscoveryDeps, DiscoveryHandle};
pub use error::{DiscoveryError, DiscoveryResult};
pub use generation::{RequestTracker, Ticket};
pub use state::{MapFrame, MapSpan, MarkerKind, PlaceMarker, Screen, ViewState};
