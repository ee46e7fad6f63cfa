//! Console implementations of the screen collaborators.
//!
//! Rendering goes to the log; the final screen is printed by the binary.
//! Alerts and navigation are also recorded so a session can report them.

use nearby_core::{Category, CategoryId, PlaceId};
use nearby_discovery::{Alert, CategoryPicker, MapFrame, MapPresenter, Navigator, Notifier};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

/// Route of the place detail view.
pub fn detail_route(place_id: &PlaceId) -> String {
    format!("/market/{place_id}")
}

/// Map presenter that logs each frame.
#[derive(Debug, Default)]
pub struct ConsoleMap {
    renders: Mutex<usize>,
}

impl ConsoleMap {
    /// Number of render calls so far.
    pub fn renders(&self) -> usize {
        *self.renders.lock()
    }
}

impl MapPresenter for ConsoleMap {
    fn render_loading(&self) {
        *self.renders.lock() += 1;
        debug!("Map: loading location");
    }

    fn render_unavailable(&self, message: &str) {
        *self.renders.lock() += 1;
        debug!(message, "Map: location unavailable");
    }

    fn render_map(&self, frame: &MapFrame) {
        *self.renders.lock() += 1;
        debug!(
            center = %frame.center,
            markers = frame.markers.len(),
            places = frame.places.len(),
            "Map: frame"
        );
    }
}

/// Category picker that logs the list and selection.
#[derive(Debug, Default)]
pub struct ConsolePicker;

impl CategoryPicker for ConsolePicker {
    fn render(&self, categories: &[Category], selected: Option<&CategoryId>) {
        debug!(
            count = categories.len(),
            selected = selected.map(CategoryId::as_str).unwrap_or("-"),
            "Picker: categories"
        );
    }
}

/// Notifier that logs alerts and keeps them for the session report.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl ConsoleNotifier {
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().clone()
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, alert: &Alert) {
        warn!(
            kind = alert.kind.as_str(),
            detail = %alert.detail,
            "{alert}"
        );
        self.alerts.lock().push(alert.clone());
    }
}

/// Navigator that records detail routes instead of switching screens.
#[derive(Debug, Default)]
pub struct ConsoleNavigator {
    routes: Mutex<Vec<String>>,
}

impl ConsoleNavigator {
    /// Routes opened so far, in order.
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for ConsoleNavigator {
    fn navigate_to_detail(&self, place_id: &PlaceId) {
        let route = detail_route(place_id);
        info!(%route, "Navigating to place detail");
        self.routes.lock().push(route);
    }
}
