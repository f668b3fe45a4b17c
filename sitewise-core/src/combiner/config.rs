//! Validated combiner parameters.

use thiserror::Error;

/// Tolerance applied when checking that weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Errors raised while building combiner parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A weight was NaN, infinite or negative.
    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight {
        /// Signal the weight applies to.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The weights did not add up to one.
    #[error("weights must sum to 1.0, got {sum}")]
    WeightSum {
        /// Actual sum of the four weights.
        sum: f64,
    },
    /// A threshold was NaN or infinite.
    #[error("band thresholds must be finite, got lower {lower} and upper {upper}")]
    NonFiniteThreshold {
        /// Rejected lower threshold.
        lower: f64,
        /// Rejected upper threshold.
        upper: f64,
    },
    /// The upper threshold sat below the lower one.
    #[error("upper threshold {upper} is below lower threshold {lower}")]
    InvertedThresholds {
        /// Rejected lower threshold.
        lower: f64,
        /// Rejected upper threshold.
        upper: f64,
    },
    /// A signal range was non-finite or had `max < min`.
    #[error("range for `{name}` is invalid: min {min}, max {max}")]
    InvalidRange {
        /// Signal the range applies to.
        name: &'static str,
        /// Rejected minimum.
        min: f64,
        /// Rejected maximum.
        max: f64,
    },
    /// A cap was NaN, infinite or negative.
    #[error("`{name}` must be finite and non-negative, got {value}")]
    InvalidCap {
        /// Name of the cap.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
}

/// Inclusive range used to normalise a raw signal.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalRange {
    /// Value mapped to zero.
    pub min: f64,
    /// Value mapped to one.
    pub max: f64,
}

impl SignalRange {
    /// Build a range without validation.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.max >= self.min {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Normalisation bounds for the four signals.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoringBounds {
    /// Population density range, people per raster cell.
    pub population: SignalRange,
    /// Competitor count range.
    pub competitors: SignalRange,
    /// Distance at which accessibility reaches zero, in metres.
    pub max_proximity_distance_meters: f64,
    /// Complementary count at which the signal saturates.
    pub max_complementary_count: f64,
}

impl Default for ScoringBounds {
    fn default() -> Self {
        Self {
            population: SignalRange::new(0.0, 5000.0),
            competitors: SignalRange::new(0.0, 50.0),
            max_proximity_distance_meters: 2000.0,
            max_complementary_count: 20.0,
        }
    }
}

impl ScoringBounds {
    /// Check ranges are ordered and caps are finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.population.validate("population")?;
        self.competitors.validate("competitors")?;
        require_cap(
            "max_proximity_distance_meters",
            self.max_proximity_distance_meters,
        )?;
        require_cap("max_complementary_count", self.max_complementary_count)
    }
}

fn require_cap(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidCap { name, value })
    }
}

/// Relative contribution of each normalised signal.
///
/// # Examples
/// ```
/// use sitewise_core::ScoreWeights;
///
/// assert!(ScoreWeights::default().validate().is_ok());
/// let lopsided = ScoreWeights { population: 0.9, ..ScoreWeights::default() };
/// assert!(lopsided.validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreWeights {
    /// Weight of normalised population density.
    pub population: f64,
    /// Weight of the inverted competitor signal.
    pub competition: f64,
    /// Weight of network accessibility.
    pub accessibility: f64,
    /// Weight of complementary feature density.
    pub complementary: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            population: 0.4,
            competition: 0.3,
            accessibility: 0.1,
            complementary: 0.2,
        }
    }
}

impl ScoreWeights {
    /// Check each weight is finite and non-negative and that they sum to one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("population", self.population),
            ("competition", self.competition),
            ("accessibility", self.accessibility),
            ("complementary", self.complementary),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum: f64 = named.iter().map(|(_, value)| value).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

/// Score thresholds separating the three bands.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BandThresholds {
    lower: f64,
    upper: f64,
}

impl Default for BandThresholds {
    fn default() -> Self {
        Self {
            lower: 0.4,
            upper: 0.7,
        }
    }
}

impl BandThresholds {
    /// Build thresholds, rejecting non-finite or inverted values.
    pub fn new(lower: f64, upper: f64) -> Result<Self, ConfigError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(ConfigError::NonFiniteThreshold { lower, upper });
        }
        if upper < lower {
            return Err(ConfigError::InvertedThresholds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    /// Lowest score classed as moderate.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Lowest score classed as highly suitable.
    pub fn upper(&self) -> f64 {
        self.upper
    }
}
