use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError};
use crate::models::restaurant::{Coordinates, RestaurantRecord};

const MAPS_PLACE_URL: &str = "https://www.google.com/maps/place/?q=place_id:";

/// Body of a `google_maps` search. The provider reports failures, including
/// running out of pages, through `error` rather than the status code alone.
#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub local_results: Vec<LocalResult>,
    pub error: Option<String>,
}

/// One venue as returned by the provider. Fields of the wrong JSON type are
/// dropped to `None` so a single odd record cannot fail the page.
#[serde_as]
#[derive(Deserialize, Debug, Default)]
pub struct LocalResult {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub title: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub reviews: Option<u64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub address: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub phone: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub place_id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub gps_coordinates: Option<GpsCoordinates>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct GpsCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<LocalResult> for RestaurantRecord {
    fn from(result: LocalResult) -> Self {
        RestaurantRecord {
            name: result.title,
            rating: result.rating,
            review_count: result.reviews,
            address: result.address,
            phone: result.phone,
            coordinates: result.gps_coordinates.map(|gps| Coordinates {
                latitude: gps.latitude,
                longitude: gps.longitude,
            }),
            maps_link: result
                .place_id
                .map(|place_id| format!("{}{}", MAPS_PLACE_URL, place_id)),
        }
    }
}
