//! Deterministic source stubs used by unit and behaviour tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use tokio_util::sync::CancellationToken;

use crate::{
    DensityError, DensitySource, FeatureCount, FeatureQuery, FeatureQueryError, FeatureSource,
    ProximitySource,
};

/// `DensitySource` returning a fixed outcome for every location.
#[derive(Debug, Clone)]
pub struct StubDensitySource {
    outcome: Result<Option<f64>, DensityError>,
}

impl StubDensitySource {
    /// Every sample yields `value`.
    pub fn value(value: f64) -> Self {
        Self {
            outcome: Ok(Some(value)),
        }
    }

    /// Every location lies outside the dataset.
    pub fn none() -> Self {
        Self { outcome: Ok(None) }
    }

    /// Every sample fails with `error`.
    pub fn error(error: DensityError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

impl DensitySource for StubDensitySource {
    fn sample(&self, _location: Coord<f64>) -> Result<Option<f64>, DensityError> {
        self.outcome.clone()
    }
}

/// `FeatureSource` answering by substring match on the query clauses.
///
/// Rules are checked in insertion order; the first whose needle appears in
/// [`FeatureQuery::clauses`] decides the outcome. Every call is recorded,
/// including empty queries.
#[derive(Debug)]
pub struct StubFeatureSource {
    rules: Vec<(String, Result<FeatureCount, FeatureQueryError>)>,
    fallback: Result<FeatureCount, FeatureQueryError>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl Default for StubFeatureSource {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Ok(FeatureCount::empty()),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubFeatureSource {
    /// Answer queries containing `needle` with `outcome`.
    #[must_use]
    pub fn with_rule(
        mut self,
        needle: impl Into<String>,
        outcome: Result<FeatureCount, FeatureQueryError>,
    ) -> Self {
        self.rules.push((needle.into(), outcome));
        self
    }

    /// Outcome for queries no rule matches.
    #[must_use]
    pub fn with_fallback(mut self, outcome: Result<FeatureCount, FeatureQueryError>) -> Self {
        self.fallback = outcome;
        self
    }

    /// Wait `delay` before answering, honouring cancellation.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Clauses of every query received, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FeatureSource for StubFeatureSource {
    async fn fetch(
        &self,
        query: &FeatureQuery,
        cancel: &CancellationToken,
    ) -> Result<FeatureCount, FeatureQueryError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clauses().to_owned());
        }
        if let Some(delay) = self.delay {
            tokio::select! {
                () = cancel.cancelled() => return Err(FeatureQueryError::Cancelled),
                () = tokio::time::sleep(delay) => {}
            }
        }
        self.rules
            .iter()
            .find(|(needle, _)| query.clauses().contains(needle.as_str()))
            .map_or_else(|| self.fallback.clone(), |(_, outcome)| outcome.clone())
    }
}

/// `ProximitySource` returning a fixed distance and counting calls.
#[derive(Debug)]
pub struct StubProximitySource {
    distance: f64,
    fallback: f64,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubProximitySource {
    /// Always report `distance`, with `fallback` as the timeout substitute.
    pub fn new(distance: f64, fallback: f64) -> Self {
        Self {
            distance,
            fallback,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Wait `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups performed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProximitySource for StubProximitySource {
    async fn snap_distance(&self, _location: Coord<f64>) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.distance
    }

    fn fallback_distance(&self) -> f64 {
        self.fallback
    }
}
