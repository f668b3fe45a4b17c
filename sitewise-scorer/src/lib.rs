//! Request-time orchestration for Sitewise site scoring.
//!
//! [`SiteScorer`] validates a [`ScoreRequest`](sitewise_core::ScoreRequest),
//! resolves its category once, and gathers four signals concurrently:
//! - population density from a [`DensitySource`](sitewise_core::DensitySource),
//!   sampled on the blocking pool;
//! - competitor and complementary feature counts from a
//!   [`FeatureSource`](sitewise_core::FeatureSource);
//! - network proximity from a [`ProximitySource`](sitewise_core::ProximitySource).
//!
//! Each signal runs under its own timeout and the whole request under a
//! deadline. Only the competitor count is mandatory; the other signals fall
//! back to neutral values when their upstream misbehaves.
//!
//! # Examples
//!
//! ```
//! use sitewise_core::ScoreRequest;
//! use sitewise_core::test_support::{
//!     StubDensitySource, StubFeatureSource, StubProximitySource,
//! };
//! use sitewise_scorer::{ScorerConfig, SiteScorer};
//!
//! # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
//! let scorer = SiteScorer::new(
//!     StubDensitySource::value(2500.0),
//!     StubFeatureSource::default(),
//!     StubProximitySource::new(300.0, 1200.0),
//!     ScorerConfig::default(),
//! );
//! let request = ScoreRequest::new(37.4221, -122.0841, 1000.0, "restaurant");
//! let result = scorer.score(&request).await.expect("score");
//! assert!((0.0..=1.0).contains(&result.score));
//! # });
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod scorer;

pub use config::{ScorerConfig, SignalTimeouts};
pub use error::ScoreError;
pub use scorer::{SiteAssessment, SiteScorer};

#[cfg(test)]
mod tests;
