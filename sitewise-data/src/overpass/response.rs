//! Overpass JSON response types.
//!
//! Only the fields needed for counting are decoded. Elements lacking a
//! recognised `type` or an `id` are dropped before deduplication.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#JSON>

use std::collections::BTreeMap;

use geo::Coord;
use serde::Deserialize;
use sitewise_core::FeatureElement;

/// Top-level interpreter response.
#[derive(Debug, Deserialize)]
pub struct InterpreterResponse {
    /// Matched elements; absent or `null` means nothing matched.
    #[serde(default)]
    pub elements: Option<Vec<RawElement>>,
}

impl InterpreterResponse {
    /// Typed elements in response order, skipping unusable entries.
    pub fn into_features(self) -> impl Iterator<Item = FeatureElement> {
        self.elements
            .unwrap_or_default()
            .into_iter()
            .filter_map(RawElement::into_feature)
    }
}

/// Element as returned by Overpass with `out center`.
#[derive(Debug, Deserialize)]
pub struct RawElement {
    /// `node`, `way` or `relation`.
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    /// Identifier, unique per type.
    pub id: Option<u64>,
    /// Node latitude.
    pub lat: Option<f64>,
    /// Node longitude.
    pub lon: Option<f64>,
    /// Way or relation centroid.
    pub center: Option<RawCenter>,
    /// OpenStreetMap tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

/// Centroid of a way or relation. A partial centre carries no location.
#[derive(Debug, Deserialize)]
pub struct RawCenter {
    /// Latitude in degrees.
    pub lat: Option<f64>,
    /// Longitude in degrees.
    pub lon: Option<f64>,
}

impl RawElement {
    fn into_feature(self) -> Option<FeatureElement> {
        let element_type = self.element_type?.parse().ok()?;
        let id = self.id?;
        let location = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => Some(Coord { x: lon, y: lat }),
            (_, _, Some(RawCenter {
                lat: Some(lat),
                lon: Some(lon),
            })) => Some(Coord { x: lon, y: lat }),
            _ => None,
        };
        Some(FeatureElement {
            element_type,
            id,
            tags: self.tags,
            location,
        })
    }
}
