//! OpenRouteService snap request and response types.
//!
//! See: <https://openrouteservice.org/dev/#/api-docs/snap>

use serde::{Deserialize, Serialize};

/// Body of `POST /v2/snap/{profile}/json`.
#[derive(Debug, Serialize)]
pub struct SnapRequest {
    /// `[lon, lat]` pairs to snap.
    pub locations: Vec<[f64; 2]>,
    /// Search radius in metres.
    pub radius: f64,
}

/// Snap response; unsnappable inputs appear as `null` entries.
#[derive(Debug, Deserialize)]
pub struct SnapResponse {
    /// One entry per requested location.
    #[serde(default)]
    pub locations: Vec<Option<SnappedLocation>>,
}

/// A single snapped location.
#[derive(Debug, Deserialize)]
pub struct SnappedLocation {
    /// Distance to the snapped point in metres.
    pub snapped_distance: Option<f64>,
    /// Older field name carrying the same distance.
    pub distance: Option<f64>,
}

impl SnapResponse {
    /// Distance for the first location, if finite and non-negative.
    ///
    /// `snapped_distance` wins over `distance` when both are present.
    pub fn first_distance(&self) -> Option<f64> {
        let first = self.locations.first()?.as_ref()?;
        first
            .snapped_distance
            .or(first.distance)
            .filter(|metres| metres.is_finite() && *metres >= 0.0)
    }
}
