//! Place ("market") type.

use crate::geo::Coordinate;
use crate::id::{CategoryId, PlaceId};
use serde::{Deserialize, Serialize};

/// A point of interest with geographic coordinates and descriptive metadata.
///
/// Coordinates may be absent or garbage on the wire. Use
/// [`Place::coordinate`] before plotting; it only returns a value when both
/// parts form a valid WGS-84 position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: PlaceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "cover")]
    pub cover_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Coupons still available at this place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupons: Option<u32>,
    /// Category the server filtered this place under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
}

impl Place {
    pub fn new(id: PlaceId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            address: String::new(),
            latitude: None,
            longitude: None,
            cover_url: String::new(),
            phone: None,
            coupons: None,
            category_id: None,
        }
    }

    #[must_use]
    pub fn with_position(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Validated position, or `None` if the place must not be plotted.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.latitude, self.longitude)
    }
}
