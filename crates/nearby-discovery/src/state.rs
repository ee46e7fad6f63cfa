//! View state and screen derivation.
//!
//! `ViewState` is the complete snapshot the controller publishes. `Screen`
//! is what the presentational layer should show for a given snapshot; it is
//! a pure function of the state plus map configuration.

use nearby_core::{Category, CategoryId, Coordinate, LocationFix, Place, PlaceId};
use nearby_location::LocationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Visible map region around the center, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapSpan {
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Default for MapSpan {
    fn default() -> Self {
        Self {
            latitude_delta: 0.01,
            longitude_delta: 0.01,
        }
    }
}

/// Everything needed to render the discovery screen at one instant.
///
/// Published as a whole; consumers never see a partially applied update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// Categories in server order. Empty until the first successful load.
    pub categories: Vec<Category>,
    /// Always one of `categories`' ids, or `None` before they load.
    pub selected_category_id: Option<CategoryId>,
    /// Places for the last applied places response.
    pub places: Vec<Place>,
    /// Device position, once acquired.
    pub location_fix: Option<LocationFix>,
    pub is_location_loading: bool,
    pub is_categories_loading: bool,
    pub is_places_loading: bool,
    /// Why `location_fix` is absent after loading finished.
    pub location_error: Option<LocationError>,
}

impl ViewState {
    /// State at mount: location and categories both in flight.
    pub fn mounting() -> Self {
        Self {
            is_location_loading: true,
            is_categories_loading: true,
            ..Default::default()
        }
    }

    /// No request of any kind is in flight.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.is_location_loading && !self.is_categories_loading && !self.is_places_loading
    }

    pub fn selected_category(&self) -> Option<&Category> {
        let selected = self.selected_category_id.as_ref()?;
        self.categories.iter().find(|c| &c.id == selected)
    }

    pub fn place(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id.as_str() == id)
    }

    /// Markers for every place with a plottable position.
    ///
    /// Places with absent or invalid coordinates are skipped.
    pub fn place_markers(&self) -> Vec<PlaceMarker> {
        self.places
            .iter()
            .filter_map(|place| match place.coordinate() {
                Some(coordinate) => Some(PlaceMarker::for_place(place, coordinate)),
                None => {
                    debug!(place_id = %place.id, "Skipping place without valid coordinates");
                    None
                }
            })
            .collect()
    }

    /// Derive what the screen should show.
    pub fn screen(&self, span: MapSpan) -> Screen {
        if self.is_location_loading {
            return Screen::Loading;
        }

        let center = match self.location_fix.as_ref().map(LocationFix::coordinate) {
            Some(Ok(center)) => center,
            Some(Err(e)) => {
                return Screen::LocationUnavailable {
                    message: format!("Unable to get your location: {e}"),
                }
            }
            None => {
                let message = match &self.location_error {
                    Some(LocationError::PermissionDenied) => {
                        "Location permission was denied.".to_string()
                    }
                    Some(LocationError::Unavailable(reason)) => {
                        format!("Unable to get your location: {reason}")
                    }
                    None => "Unable to get your location.".to_string(),
                };
                return Screen::LocationUnavailable { message };
            }
        };

        Screen::Ready(MapFrame {
            center,
            span,
            user_marker: center,
            markers: self.place_markers(),
            categories: self.categories.clone(),
            selected_category_id: self.selected_category_id.clone(),
            places: self.places.clone(),
        })
    }
}

/// What to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    /// Location still resolving: a loading indicator and nothing else.
    Loading,
    /// Location failed; render an empty state with this message.
    LocationUnavailable { message: String },
    /// Map centered on the user with place markers.
    Ready(MapFrame),
}

/// Presentational concern attached to a marker (e.g., which pin image).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    CurrentPosition,
    Place,
}

/// A place marker with callout content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceMarker {
    pub id: PlaceId,
    pub coordinate: Coordinate,
    pub title: String,
    pub subtitle: String,
    pub kind: MarkerKind,
}

impl PlaceMarker {
    fn for_place(place: &Place, coordinate: Coordinate) -> Self {
        Self {
            id: place.id.clone(),
            coordinate,
            title: place.name.clone(),
            subtitle: place.address.clone(),
            kind: MarkerKind::Place,
        }
    }
}

/// Input for the map presenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    /// Retrieved device position.
    pub center: Coordinate,
    pub span: MapSpan,
    /// Rendered with [`MarkerKind::CurrentPosition`].
    pub user_marker: Coordinate,
    /// May be empty, and may lag behind `center` while places load.
    pub markers: Vec<PlaceMarker>,
    pub categories: Vec<Category>,
    pub selected_category_id: Option<CategoryId>,
    pub places: Vec<Place>,
}
