//! Reduce a [`SignalSet`] to a bounded, classified score.
//!
//! Each raw signal is first mapped onto `0.0..=1.0`: population density and
//! competitor count against configured ranges, distance against a maximum
//! (closer is better), complementary count against a saturation cap. The
//! competitor term is inverted so fewer competitors score higher. The
//! weighted sum is clamped once more before banding, which absorbs
//! floating-point drift in the weights.

mod config;

pub use config::{
    BandThresholds, ConfigError, ScoreWeights, ScoringBounds, SignalRange, WEIGHT_SUM_TOLERANCE,
};

use crate::signals::{ScoreResult, SignalSet, SuitabilityBand};

/// Normalised contribution of each signal before weighting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreComponents {
    /// Population density mapped onto the configured range.
    pub population: f64,
    /// One minus the normalised competitor count.
    pub competition: f64,
    /// One minus distance over the maximum distance.
    pub accessibility: f64,
    /// Complementary count over its cap.
    pub complementary: f64,
}

/// Weighted score combiner.
///
/// # Examples
/// ```
/// use sitewise_core::{ScoreCombiner, SignalSet, SuitabilityBand};
///
/// let combiner = ScoreCombiner::default();
/// let result = combiner.combine(&SignalSet {
///     population_density: 1500.0,
///     competitor_count: 2,
///     proximity_distance_meters: 50.0,
///     complementary_count: 8,
/// });
/// assert!((result.raw_score - 0.5855).abs() < 1e-12);
/// assert_eq!(result.band, SuitabilityBand::Moderate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreCombiner {
    bounds: ScoringBounds,
    weights: ScoreWeights,
    thresholds: BandThresholds,
}

impl ScoreCombiner {
    /// Build a combiner after validating every parameter.
    pub fn new(
        bounds: ScoringBounds,
        weights: ScoreWeights,
        thresholds: BandThresholds,
    ) -> Result<Self, ConfigError> {
        bounds.validate()?;
        weights.validate()?;
        Ok(Self {
            bounds,
            weights,
            thresholds,
        })
    }

    /// Normalisation bounds in use.
    pub fn bounds(&self) -> &ScoringBounds {
        &self.bounds
    }

    /// Signal weights in use.
    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Band thresholds in use.
    pub fn thresholds(&self) -> &BandThresholds {
        &self.thresholds
    }

    /// Normalise each signal without weighting.
    pub fn components(&self, signals: &SignalSet) -> ScoreComponents {
        let bounds = &self.bounds;
        let competitors = normalise(count_as_f64(signals.competitor_count), bounds.competitors);
        ScoreComponents {
            population: normalise(signals.population_density, bounds.population),
            competition: 1.0 - competitors,
            accessibility: accessibility(
                signals.proximity_distance_meters,
                bounds.max_proximity_distance_meters,
            ),
            complementary: saturate(
                count_as_f64(signals.complementary_count),
                bounds.max_complementary_count,
            ),
        }
    }

    /// Combine signals into a score and band.
    pub fn combine(&self, signals: &SignalSet) -> ScoreResult {
        let parts = self.components(signals);
        let weights = &self.weights;
        let raw_score = weights.population * parts.population
            + weights.competition * parts.competition
            + weights.accessibility * parts.accessibility
            + weights.complementary * parts.complementary;
        let score = clamp_unit(raw_score);
        ScoreResult {
            raw_score,
            score,
            band: self.classify(score),
        }
    }

    /// Band a score; lower edges are inclusive.
    pub fn classify(&self, score: f64) -> SuitabilityBand {
        if score >= self.thresholds.upper() {
            SuitabilityBand::HighlySuitable
        } else if score >= self.thresholds.lower() {
            SuitabilityBand::Moderate
        } else {
            SuitabilityBand::NotSuitable
        }
    }
}

/// Map `value` onto `0.0..=1.0` within `range`.
///
/// Non-finite values map to zero. A degenerate range maps values at or
/// below its minimum to zero and everything else to one.
pub fn normalise(value: f64, range: SignalRange) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let span = range.max - range.min;
    if span == 0.0 {
        return if value <= range.min { 0.0 } else { 1.0 };
    }
    clamp_unit((value - range.min) / span)
}

fn accessibility(distance: f64, max_distance: f64) -> f64 {
    if !distance.is_finite() {
        return 0.0;
    }
    let max_distance = if max_distance == 0.0 { 1.0 } else { max_distance };
    clamp_unit(1.0 - distance / max_distance)
}

fn saturate(count: f64, cap: f64) -> f64 {
    let cap = if cap == 0.0 { 1.0 } else { cap };
    clamp_unit(count / cap)
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// Feature counts stay far below 2^52, so the conversion is exact.
fn count_as_f64(count: u64) -> f64 {
    count as f64
}
