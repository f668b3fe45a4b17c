//! Concurrent signal gathering and scoring.
#![forbid(unsafe_code)]

use std::sync::Arc;

use geo::Coord;
use log::{debug, info, warn};
use sitewise_core::{
    CategoryKey, DensitySource, FeatureQuery, FeatureSource, ProximitySource, ScoreRequest,
    ScoreResult, SignalSet, normalise_category,
};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::{ScoreError, ScorerConfig};

/// Signals and verdict for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteAssessment {
    /// Category the request resolved to.
    pub category: CategoryKey,
    /// Raw signals, fallbacks included.
    pub signals: SignalSet,
    /// Combined score.
    pub result: ScoreResult,
}

/// Scores sites by querying three upstream sources concurrently.
///
/// The density source is shared with the blocking thread pool, so it is
/// held behind an [`Arc`].
#[derive(Debug)]
pub struct SiteScorer<D, F, P> {
    density: Arc<D>,
    features: F,
    proximity: P,
    config: ScorerConfig,
}

impl<D, F, P> SiteScorer<D, F, P>
where
    D: DensitySource + 'static,
    F: FeatureSource,
    P: ProximitySource,
{
    /// Assemble a scorer from its sources.
    pub fn new(density: D, features: F, proximity: P, config: ScorerConfig) -> Self {
        Self {
            density: Arc::new(density),
            features,
            proximity,
            config,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Feature source used for both feature queries.
    #[must_use]
    pub const fn feature_source(&self) -> &F {
        &self.features
    }

    /// Proximity source.
    #[must_use]
    pub const fn proximity_source(&self) -> &P {
        &self.proximity
    }

    /// Score `request`.
    ///
    /// # Errors
    /// See [`SiteScorer::assess`].
    pub async fn score(&self, request: &ScoreRequest) -> Result<ScoreResult, ScoreError> {
        Ok(self.assess(request).await?.result)
    }

    /// Gather every signal for `request` and combine them.
    ///
    /// Population and complementary failures degrade to zero, and the
    /// proximity lookup degrades to its fallback distance. The competitor
    /// count has no substitute.
    ///
    /// Both feature queries share one [`CancellationToken`]. A failed
    /// competitor query or an expired deadline drops the remaining signal
    /// futures, which stops their in-flight requests. The token is cancelled
    /// whenever the assessment ends, so work a source detached from its
    /// future observes the end of the request as well.
    ///
    /// # Errors
    /// Returns [`ScoreError::InvalidInput`] before any upstream call,
    /// [`ScoreError::Configuration`] when the raster is unusable,
    /// [`ScoreError::UpstreamUnavailable`] or [`ScoreError::UpstreamTimeout`]
    /// when the competitor query fails, and [`ScoreError::RequestTimeout`]
    /// when the overall deadline passes.
    pub async fn assess(&self, request: &ScoreRequest) -> Result<SiteAssessment, ScoreError> {
        request.validate()?;
        let category = normalise_category(&request.category);
        if category.is_generic() {
            debug!("category {:?} resolved to the generic profile", request.category);
        }
        let location = request.location;
        let profiles = &self.config.profiles;
        let competitor_query = FeatureQuery::single(
            &profiles.competitor_clause(&category),
            location,
            request.radius_meters,
        )
        .with_server_timeout(self.config.server_timeout_secs);
        let complementary_query = FeatureQuery::from_profile(
            profiles.complementary_profile(&category),
            location,
            request.radius_meters,
        )
        .with_server_timeout(self.config.server_timeout_secs);
        debug!(
            "scoring {category} at ({}, {}) within {} m",
            request.lat(),
            request.lon(),
            request.radius_meters
        );

        let cancel = CancellationToken::new();
        let _cancel_on_exit = cancel.clone().drop_guard();
        let deadline = self.config.timeouts.request;
        let gathered = timeout(deadline, async {
            tokio::try_join!(
                self.population(location),
                self.competitors(&competitor_query, &cancel),
                async {
                    Ok::<_, ScoreError>(self.complementary(&complementary_query, &cancel).await)
                },
                async { Ok::<_, ScoreError>(self.proximity(location).await) },
            )
        })
        .await;

        let (population_density, competitor_count, complementary_count, proximity_distance_meters) =
            match gathered {
                Ok(Ok(values)) => values,
                Ok(Err(err)) => return Err(err),
                Err(_) => {
                    warn!("score request for {category} exceeded {deadline:?}");
                    return Err(ScoreError::RequestTimeout { deadline });
                }
            };

        let signals = SignalSet {
            population_density,
            competitor_count,
            proximity_distance_meters,
            complementary_count,
        };
        let result = self.config.combiner.combine(&signals);
        info!(
            "scored {category}: {:.4} ({}) from {signals:?}",
            result.score, result.band
        );
        Ok(SiteAssessment {
            category,
            signals,
            result,
        })
    }

    async fn population(&self, location: Coord<f64>) -> Result<f64, ScoreError> {
        let limit = self.config.timeouts.population;
        let density = Arc::clone(&self.density);
        let task = tokio::task::spawn_blocking(move || density.sample(location));
        match timeout(limit, task).await {
            Ok(Ok(Ok(Some(value)))) => Ok(value),
            Ok(Ok(Ok(None))) => {
                debug!("no population density at location; using 0");
                Ok(0.0)
            }
            Ok(Ok(Err(source))) if source.is_configuration() => {
                Err(ScoreError::Configuration { source })
            }
            Ok(Ok(Err(err))) => {
                warn!("population sample failed ({err}); using 0");
                Ok(0.0)
            }
            Ok(Err(err)) => {
                warn!("population task failed ({err}); using 0");
                Ok(0.0)
            }
            Err(_) => {
                warn!("population sample exceeded {limit:?}; using 0");
                Ok(0.0)
            }
        }
    }

    async fn competitors(
        &self,
        query: &FeatureQuery,
        cancel: &CancellationToken,
    ) -> Result<u64, ScoreError> {
        let limit = self.config.timeouts.competitors;
        match timeout(limit, self.features.fetch(query, cancel)).await {
            Ok(Ok(found)) => Ok(found.count()),
            Ok(Err(source)) => {
                warn!("competitor query failed: {source}");
                Err(ScoreError::UpstreamUnavailable { source })
            }
            Err(_) => {
                warn!("competitor query exceeded {limit:?}");
                Err(ScoreError::UpstreamTimeout { timeout: limit })
            }
        }
    }

    async fn complementary(&self, query: &FeatureQuery, cancel: &CancellationToken) -> u64 {
        if query.is_empty() {
            debug!("category has no complementary profile; skipping query");
            return 0;
        }
        let limit = self.config.timeouts.complementary;
        match timeout(limit, self.features.fetch(query, cancel)).await {
            Ok(Ok(found)) => found.count(),
            Ok(Err(err)) => {
                warn!("complementary query failed ({err}); using 0");
                0
            }
            Err(_) => {
                warn!("complementary query exceeded {limit:?}; using 0");
                0
            }
        }
    }

    async fn proximity(&self, location: Coord<f64>) -> f64 {
        let limit = self.config.timeouts.proximity;
        if let Ok(distance) = timeout(limit, self.proximity.snap_distance(location)).await {
            distance
        } else {
            let fallback = self.proximity.fallback_distance();
            warn!("proximity lookup exceeded {limit:?}; using {fallback} m");
            fallback
        }
    }
}
