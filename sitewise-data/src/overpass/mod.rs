//! Feature counts from an Overpass API endpoint.
//!
//! [`OverpassFeatureSource`] implements [`sitewise_core::FeatureSource`]. It
//! posts rendered Overpass QL as `text/plain`, retries overloaded or
//! unreachable servers with exponential backoff, and deduplicates the
//! returned elements by `(type, id)`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use geo::Coord;
//! use sitewise_core::{FeatureQuery, FeatureSource};
//! use sitewise_data::overpass::{OverpassConfig, OverpassFeatureSource, RetryPolicy};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OverpassConfig::new("https://overpass-api.de/api/interpreter")
//!     .with_timeout(Duration::from_secs(30))
//!     .with_retry(RetryPolicy::new(3, Duration::from_millis(500)));
//! let source = OverpassFeatureSource::with_config(config)?;
//! let query = FeatureQuery::single("amenity=cafe", Coord { x: -0.1, y: 51.5 }, 500.0);
//! let count = source.fetch(&query, &CancellationToken::new()).await?;
//! println!("{} cafes", count.count());
//! # Ok(())
//! # }
//! ```

mod config;
mod response;
mod source;

pub use config::{DEFAULT_OVERPASS_URL, OverpassConfig, RetryPolicy};
pub use source::OverpassFeatureSource;
