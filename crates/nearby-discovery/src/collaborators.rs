//! External collaborators of the discovery screen.
//!
//! These traits are implemented by the presentational layer. They receive
//! already-computed data and report user actions back through
//! [`DiscoveryHandle`](crate::DiscoveryHandle).

use std::fmt;
use std::sync::Arc;

use nearby_core::{Category, CategoryId, PlaceId};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::state::{MapFrame, MapSpan, Screen, ViewState};

/// Renders the map area.
pub trait MapPresenter: Send + Sync {
    /// Location is still resolving.
    fn render_loading(&self);

    /// Location failed; show an empty state instead of a map.
    fn render_unavailable(&self, message: &str);

    /// Map centered on `frame.center`. Must accept an empty marker list.
    ///
    /// Activating a marker's detail affordance should call
    /// [`DiscoveryHandle::open_place`](crate::DiscoveryHandle::open_place).
    fn render_map(&self, frame: &MapFrame);
}

/// Renders the category list.
///
/// Must visually distinguish `selected`. New choices go to
/// [`DiscoveryHandle::select_category`](crate::DiscoveryHandle::select_category).
pub trait CategoryPicker: Send + Sync {
    fn render(&self, categories: &[Category], selected: Option<&CategoryId>);
}

/// Opens the detail view for a place. Fire-and-forget.
pub trait Navigator: Send + Sync {
    fn navigate_to_detail(&self, place_id: &PlaceId);
}

/// Shows user-visible, non-fatal alerts.
pub trait Notifier: Send + Sync {
    fn notify(&self, alert: &Alert);
}

/// Which flow raised an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Location,
    Categories,
    Places,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Location => "location",
            AlertKind::Categories => "categories",
            AlertKind::Places => "places",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::Location => "Location",
            AlertKind::Categories => "Categories",
            AlertKind::Places => "Places",
        }
    }

    fn message(&self) -> &'static str {
        match self {
            AlertKind::Location => "Unable to get your location.",
            AlertKind::Categories => "Unable to load the categories.",
            AlertKind::Places => "Unable to load the places.",
        }
    }
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: &'static str,
    pub message: &'static str,
    /// Underlying error, for logs rather than display.
    pub detail: String,
}

impl Alert {
    pub fn new(kind: AlertKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            title: kind.title(),
            message: kind.message(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Notifier that only logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, alert: &Alert) {
        warn!(
            kind = alert.kind.as_str(),
            detail = %alert.detail,
            "{alert}"
        );
    }
}

/// Render one snapshot.
///
/// The picker is only rendered alongside the map; while loading or after a
/// location failure the map area is the whole screen.
pub fn render_screen(
    view: &ViewState,
    span: MapSpan,
    map: &dyn MapPresenter,
    picker: &dyn CategoryPicker,
) {
    match view.screen(span) {
        Screen::Loading => map.render_loading(),
        Screen::LocationUnavailable { message } => map.render_unavailable(&message),
        Screen::Ready(frame) => {
            picker.render(&frame.categories, frame.selected_category_id.as_ref());
            map.render_map(&frame);
        }
    }
}

/// Render every published snapshot until the controller shuts down.
pub async fn drive_screen(
    mut rx: watch::Receiver<ViewState>,
    span: MapSpan,
    map: Arc<dyn MapPresenter>,
    picker: Arc<dyn CategoryPicker>,
) {
    info!("Screen driver started");

    loop {
        let view = rx.borrow_and_update().clone();
        render_screen(&view, span, map.as_ref(), picker.as_ref());

        if rx.changed().await.is_err() {
            break;
        }
    }

    debug!("Screen driver stopped");
}
