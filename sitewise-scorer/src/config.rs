//! Orchestration settings.
#![forbid(unsafe_code)]

use std::time::Duration;

use sitewise_core::query::DEFAULT_SERVER_TIMEOUT_SECS;
use sitewise_core::{CategoryProfiles, ScoreCombiner};

/// Per-signal time limits plus the overall request deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTimeouts {
    /// Raster sample.
    pub population: Duration,
    /// Competitor feature query, retries included.
    pub competitors: Duration,
    /// Complementary feature query, retries included.
    pub complementary: Duration,
    /// Network-proximity lookup.
    pub proximity: Duration,
    /// Whole request.
    pub request: Duration,
}

impl Default for SignalTimeouts {
    fn default() -> Self {
        Self {
            population: Duration::from_secs(5),
            competitors: Duration::from_secs(75),
            complementary: Duration::from_secs(75),
            proximity: Duration::from_secs(15),
            request: Duration::from_secs(90),
        }
    }
}

/// Immutable configuration for a [`SiteScorer`](crate::SiteScorer).
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use sitewise_scorer::{ScorerConfig, SignalTimeouts};
///
/// let config = ScorerConfig::default().with_timeouts(SignalTimeouts {
///     request: Duration::from_secs(20),
///     ..SignalTimeouts::default()
/// });
/// assert_eq!(config.timeouts.request, Duration::from_secs(20));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    /// Competitor clauses and complementary profiles per category.
    pub profiles: CategoryProfiles,
    /// Reduces signals to a score.
    pub combiner: ScoreCombiner,
    /// Time limits.
    pub timeouts: SignalTimeouts,
    /// `[timeout:N]` setting sent inside every feature query.
    pub server_timeout_secs: u32,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            profiles: CategoryProfiles::default(),
            combiner: ScoreCombiner::default(),
            timeouts: SignalTimeouts::default(),
            server_timeout_secs: DEFAULT_SERVER_TIMEOUT_SECS,
        }
    }
}

impl ScorerConfig {
    /// Replace the category profile table.
    #[must_use]
    pub fn with_profiles(mut self, profiles: CategoryProfiles) -> Self {
        self.profiles = profiles;
        self
    }

    /// Replace the combiner.
    #[must_use]
    pub fn with_combiner(mut self, combiner: ScoreCombiner) -> Self {
        self.combiner = combiner;
        self
    }

    /// Replace the time limits.
    #[must_use]
    pub fn with_timeouts(mut self, timeouts: SignalTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set the server-side query timeout.
    #[must_use]
    pub fn with_server_timeout(mut self, secs: u32) -> Self {
        self.server_timeout_secs = secs;
        self
    }
}
