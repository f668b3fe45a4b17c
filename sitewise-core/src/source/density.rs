//! Population density lookup.

use geo::Coord;

use super::error::DensityError;

/// Sample population density at a point.
///
/// `Ok(None)` means the point lies outside the dataset or the cell holds no
/// usable value; callers treat it as zero density.
///
/// # Examples
///
/// ```rust
/// use geo::Coord;
/// use sitewise_core::{DensityError, DensitySource};
///
/// struct Flat(f64);
///
/// impl DensitySource for Flat {
///     fn sample(&self, _location: Coord<f64>) -> Result<Option<f64>, DensityError> {
///         Ok(Some(self.0))
///     }
/// }
///
/// assert_eq!(Flat(12.5).sample(Coord { x: 0.0, y: 0.0 })?, Some(12.5));
/// # Ok::<(), DensityError>(())
/// ```
pub trait DensitySource: Send + Sync {
    /// Density at `location` (`x = longitude`, `y = latitude`).
    fn sample(&self, location: Coord<f64>) -> Result<Option<f64>, DensityError>;
}
