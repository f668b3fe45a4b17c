//! Seams between the orchestrator and upstream services.
//!
//! Each signal comes from a trait object so the scorer can be exercised
//! against stubs. [`DensitySource`] performs local, blocking I/O and is
//! called from the blocking pool. [`FeatureSource`] and [`ProximitySource`]
//! are asynchronous; the latter never fails because proximity degrades to a
//! fallback distance.

mod density;
mod error;
mod feature;
mod proximity;

pub use density::DensitySource;
pub use error::{DensityError, FeatureQueryError};
pub use feature::FeatureSource;
pub use proximity::ProximitySource;
