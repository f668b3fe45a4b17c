//! Facade crate for the Sitewise site-suitability engine.
//!
//! This crate re-exports the core domain types and exposes the upstream
//! adapters and the scoring orchestrator behind feature flags.

#![forbid(unsafe_code)]

pub use sitewise_core::{
    BandThresholds, CategoryKey, CategoryProfile, CategoryProfiles, ConfigError, DensityError,
    DensitySource, ElementType, FeatureCount, FeatureElement, FeatureQuery, FeatureQueryError,
    FeatureSource, ProximitySource, ScoreCombiner, ScoreComponents, ScoreRequest,
    ScoreRequestError, ScoreResult, ScoreWeights, ScoringBounds, SignalRange, SignalSet,
    SuitabilityBand, TagProfile, normalise_category,
};

#[cfg(feature = "data")]
pub use sitewise_data::{
    overpass::{OverpassConfig, OverpassFeatureSource, RetryPolicy},
    raster::{GeoTiffDensitySource, RasterError},
    routing::{OrsConfig, OrsProximitySource},
};

#[cfg(feature = "scorer")]
pub use sitewise_scorer::{ScoreError, ScorerConfig, SignalTimeouts, SiteAssessment, SiteScorer};

#[cfg(feature = "test-support")]
pub use sitewise_core::test_support;
