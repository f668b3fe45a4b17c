//! Road-network proximity.

use async_trait::async_trait;
use geo::Coord;

/// Distance from a point to the nearest routable network location.
///
/// Lookups never fail. Implementations return [`fallback_distance`] when the
/// service is unconfigured or misbehaves, and callers use the same value if
/// a lookup exceeds its time budget.
///
/// [`fallback_distance`]: ProximitySource::fallback_distance
#[async_trait]
pub trait ProximitySource: Send + Sync {
    /// Snap distance in metres for `location`.
    async fn snap_distance(&self, location: Coord<f64>) -> f64;

    /// Distance substituted when no measurement is available.
    fn fallback_distance(&self) -> f64;
}
