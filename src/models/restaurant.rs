use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Zoom level sent with every anchored page request.
pub const ANCHOR_ZOOM: u8 = 14;

#[skip_serializing_none]
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct RestaurantRecord {
    pub name: Option<String>,
    pub rating: Option<f64>,
    #[serde(rename = "reviews")]
    pub review_count: Option<u64>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub maps_link: Option<String>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Map viewport that keeps every page after the first on the same area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoAnchor {
    pub coordinates: Coordinates,
    pub zoom: u8,
}

impl GeoAnchor {
    pub fn from_record(record: &RestaurantRecord) -> Option<Self> {
        record.coordinates.map(|coordinates| Self {
            coordinates,
            zoom: ANCHOR_ZOOM,
        })
    }

    /// Formats the anchor as the provider's `ll` parameter, e.g. `@1.3,103.8,14z`.
    pub fn as_ll_param(&self) -> String {
        format!(
            "@{},{},{}z",
            self.coordinates.latitude, self.coordinates.longitude, self.zoom
        )
    }
}
