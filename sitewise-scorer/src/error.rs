//! Error types raised while scoring a site.
#![forbid(unsafe_code)]

use std::time::Duration;

use sitewise_core::{DensityError, FeatureQueryError, ScoreRequestError};
use thiserror::Error;

/// Errors returned by [`SiteScorer`](crate::SiteScorer).
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The request failed validation; no upstream was contacted.
    #[error("invalid score request: {0}")]
    InvalidInput(#[from] ScoreRequestError),
    /// The population dataset is unusable as configured.
    #[error("population dataset is misconfigured")]
    Configuration {
        /// Underlying density error.
        #[source]
        source: DensityError,
    },
    /// The competitor query failed; a score without it would be misleading.
    #[error("competitor query failed")]
    UpstreamUnavailable {
        /// Failure reported by the feature source.
        #[source]
        source: FeatureQueryError,
    },
    /// The competitor query did not answer within its own timeout.
    #[error("competitor query timed out after {timeout:?}")]
    UpstreamTimeout {
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// The overall request deadline passed before all signals arrived.
    #[error("score request exceeded its {deadline:?} deadline")]
    RequestTimeout {
        /// Deadline that elapsed.
        deadline: Duration,
    },
}
