//! Raw signals gathered for a request and the combined verdict.

/// The four raw signals feeding the combiner.
///
/// Fields may hold fallback values when their upstream source failed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignalSet {
    /// Population density sampled from the raster.
    pub population_density: f64,
    /// Distinct competing businesses inside the radius.
    pub competitor_count: u64,
    /// Distance to the nearest routable network point, in metres.
    pub proximity_distance_meters: f64,
    /// Distinct complementary features inside the radius.
    pub complementary_count: u64,
}

/// Categorical verdict derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SuitabilityBand {
    /// Score at or above the upper threshold.
    #[cfg_attr(feature = "serde", serde(rename = "Highly Suitable"))]
    HighlySuitable,
    /// Score between the thresholds, lower edge inclusive.
    #[cfg_attr(feature = "serde", serde(rename = "Moderate"))]
    Moderate,
    /// Score below the lower threshold.
    #[cfg_attr(feature = "serde", serde(rename = "Not Suitable"))]
    NotSuitable,
}

impl SuitabilityBand {
    /// Human-readable label.
    ///
    /// # Examples
    /// ```
    /// use sitewise_core::SuitabilityBand;
    ///
    /// assert_eq!(SuitabilityBand::HighlySuitable.as_str(), "Highly Suitable");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HighlySuitable => "Highly Suitable",
            Self::Moderate => "Moderate",
            Self::NotSuitable => "Not Suitable",
        }
    }
}

impl std::fmt::Display for SuitabilityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of combining a [`SignalSet`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreResult {
    /// Weighted sum before the final clamp.
    pub raw_score: f64,
    /// Final score in `0.0..=1.0`.
    pub score: f64,
    /// Band the score falls into.
    pub band: SuitabilityBand,
}
