//! Road-network proximity via the OpenRouteService snap endpoint.
//!
//! [`OrsProximitySource`] implements [`sitewise_core::ProximitySource`]. It
//! never fails: a missing API key, an error status, an unreachable service
//! or an unusable payload all resolve to the configured fallback distance.
//!
//! # Example
//!
//! ```no_run
//! use geo::Coord;
//! use sitewise_core::ProximitySource;
//! use sitewise_data::routing::{OrsConfig, OrsProximitySource};
//!
//! # async fn run() -> Result<(), sitewise_data::ClientBuildError> {
//! let config = OrsConfig::default().with_api_key("secret");
//! let source = OrsProximitySource::with_config(config)?;
//! let metres = source.snap_distance(Coord { x: -122.0841, y: 37.4221 }).await;
//! println!("{metres} m to the road network");
//! # Ok(())
//! # }
//! ```

mod provider;
mod snap;

pub use provider::{
    DEFAULT_FALLBACK_DISTANCE_METERS, DEFAULT_ORS_URL, OrsConfig, OrsProximitySource,
};
