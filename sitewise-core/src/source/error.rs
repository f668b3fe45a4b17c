use thiserror::Error;

/// Errors from [`crate::source::DensitySource::sample`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DensityError {
    /// The dataset cannot be used at all, e.g. it lacks a georeference.
    ///
    /// Configuration errors fail the whole request instead of degrading.
    #[error("density dataset is misconfigured: {message}")]
    Configuration {
        /// Human-readable cause.
        message: String,
    },
    /// A read failed for this sample only.
    #[error("failed to read density sample: {message}")]
    Read {
        /// Human-readable cause.
        message: String,
    },
}

impl DensityError {
    /// Report whether the error describes a misconfigured dataset.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Errors from [`crate::source::FeatureSource::fetch`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureQueryError {
    /// Retryable faults persisted across every attempt.
    #[error("feature query still failing after {attempts} attempts: {message}")]
    Transient {
        /// Attempts made before giving up.
        attempts: u32,
        /// Last HTTP status, if a response arrived.
        status: Option<u16>,
        /// Last failure description.
        message: String,
    },
    /// The service rejected the query outright.
    #[error("feature query rejected with status {status}: {message}")]
    Permanent {
        /// HTTP status returned.
        status: u16,
        /// Response body or cause.
        message: String,
    },
    /// The response could not be decoded.
    #[error("failed to decode feature response: {message}")]
    Decode {
        /// Decoder error description.
        message: String,
    },
    /// The caller cancelled the query.
    #[error("feature query cancelled")]
    Cancelled,
}

impl FeatureQueryError {
    /// Report whether the failure was retryable.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
