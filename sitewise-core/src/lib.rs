//! Core domain types for the Sitewise site-suitability engine.
//!
//! The crate owns everything that does not touch the network or the
//! filesystem: request validation, category normalisation, tag profiles,
//! Overpass query construction, element deduplication and the score
//! combiner. Upstream services are reached through the source traits in
//! [`source`], which the `sitewise-data` crate implements.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod category;
pub mod combiner;
pub mod feature;
pub mod profile;
pub mod query;
mod request;
mod signals;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use category::{CategoryKey, normalise_category};
pub use combiner::{
    BandThresholds, ConfigError, ScoreCombiner, ScoreComponents, ScoreWeights, ScoringBounds,
    SignalRange,
};
pub use feature::{ElementType, FeatureCount, FeatureElement};
pub use profile::{CategoryProfile, CategoryProfiles, TagProfile};
pub use query::FeatureQuery;
pub use request::{ScoreRequest, ScoreRequestError};
pub use signals::{ScoreResult, SignalSet, SuitabilityBand};
pub use source::{
    DensityError, DensitySource, FeatureQueryError, FeatureSource, ProximitySource,
};
