//! Incoming score requests and their validation.

use geo::Coord;
use thiserror::Error;

/// Parameters for a single site-suitability score.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`, matching
/// [`geo::Coord`] conventions elsewhere in the workspace.
///
/// # Examples
/// ```rust
/// use sitewise_core::ScoreRequest;
///
/// let request = ScoreRequest::new(37.4221, -122.0841, 1000.0, "restaurant");
/// assert_eq!(request.lat(), 37.4221);
/// assert!(request.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreRequest {
    /// Location being assessed.
    pub location: Coord<f64>,
    /// Search radius for surrounding features, in metres.
    pub radius_meters: f64,
    /// Free-form business category, normalised before use.
    pub category: String,
}

/// Errors returned by [`ScoreRequest::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreRequestError {
    /// A numeric field was NaN or infinite.
    #[error("{field} must be a finite number")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
    },
    /// Latitude fell outside `[-90, 90]`.
    #[error("latitude {lat} is outside [-90, 90]")]
    LatitudeOutOfRange {
        /// Rejected latitude.
        lat: f64,
    },
    /// Longitude fell outside `[-180, 180]`.
    #[error("longitude {lon} is outside [-180, 180]")]
    LongitudeOutOfRange {
        /// Rejected longitude.
        lon: f64,
    },
    /// The search radius was zero or negative.
    #[error("radius {radius_meters} must be greater than zero")]
    NonPositiveRadius {
        /// Rejected radius in metres.
        radius_meters: f64,
    },
}

impl ScoreRequest {
    /// Build a request from latitude/longitude order as callers usually
    /// supply it. No validation is performed.
    pub fn new(lat: f64, lon: f64, radius_meters: f64, category: impl Into<String>) -> Self {
        Self {
            location: Coord { x: lon, y: lat },
            radius_meters,
            category: category.into(),
        }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.location.y
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.location.x
    }

    /// Check ranges and finiteness, reporting the first violation.
    pub fn validate(&self) -> Result<(), ScoreRequestError> {
        let lat = self.lat();
        let lon = self.lon();
        require_finite(lat, "lat")?;
        require_finite(lon, "lon")?;
        require_finite(self.radius_meters, "radius")?;
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ScoreRequestError::LatitudeOutOfRange { lat });
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ScoreRequestError::LongitudeOutOfRange { lon });
        }
        if self.radius_meters <= 0.0 {
            return Err(ScoreRequestError::NonPositiveRadius {
                radius_meters: self.radius_meters,
            });
        }
        Ok(())
    }
}

fn require_finite(value: f64, field: &'static str) -> Result<(), ScoreRequestError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ScoreRequestError::NonFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(90.0, 180.0)]
    #[case(-90.0, -180.0)]
    #[case(0.0, 0.0)]
    fn accepts_boundary_coordinates(#[case] lat: f64, #[case] lon: f64) {
        let request = ScoreRequest::new(lat, lon, 1.0, "cafe");
        assert!(request.validate().is_ok());
    }

    #[rstest]
    #[case(f64::NAN, 0.0, 10.0, ScoreRequestError::NonFinite { field: "lat" })]
    #[case(0.0, f64::INFINITY, 10.0, ScoreRequestError::NonFinite { field: "lon" })]
    #[case(0.0, 0.0, f64::NAN, ScoreRequestError::NonFinite { field: "radius" })]
    #[case(90.5, 0.0, 10.0, ScoreRequestError::LatitudeOutOfRange { lat: 90.5 })]
    #[case(0.0, -180.5, 10.0, ScoreRequestError::LongitudeOutOfRange { lon: -180.5 })]
    #[case(0.0, 0.0, 0.0, ScoreRequestError::NonPositiveRadius { radius_meters: 0.0 })]
    #[case(0.0, 0.0, -5.0, ScoreRequestError::NonPositiveRadius { radius_meters: -5.0 })]
    fn rejects_invalid_fields(
        #[case] lat: f64,
        #[case] lon: f64,
        #[case] radius: f64,
        #[case] expected: ScoreRequestError,
    ) {
        let request = ScoreRequest::new(lat, lon, radius, "cafe");
        assert_eq!(request.validate(), Err(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_categories_are_valid(#[case] category: &str) {
        let request = ScoreRequest::new(1.0, 1.0, 100.0, category);
        assert_eq!(request.validate(), Ok(()));
    }

    #[rstest]
    fn stores_longitude_as_x() {
        let request = ScoreRequest::new(51.5, -0.1, 100.0, "gym");
        assert_eq!(request.location, Coord { x: -0.1, y: 51.5 });
    }
}
