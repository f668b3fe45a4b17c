use camino::Utf8PathBuf;
use sitewise_core::DensityError;
use thiserror::Error;

/// Errors raised while opening or sampling a GeoTIFF.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The file could not be opened.
    #[error("failed to open raster {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The TIFF structure or pixel data could not be decoded.
    #[error("failed to decode raster {path}: {source}")]
    Decode {
        /// Raster being decoded.
        path: Utf8PathBuf,
        /// Underlying decoder error.
        #[source]
        source: tiff::TiffError,
    },
    /// Neither tie-point and pixel-scale tags nor a transformation matrix
    /// were present.
    #[error("raster {path} has no usable georeference")]
    MissingGeoreference {
        /// Raster lacking georeference tags.
        path: Utf8PathBuf,
    },
    /// Pixel data used a layout this sampler cannot read.
    #[error("raster {path} uses an unsupported sample layout: {message}")]
    UnsupportedSampleFormat {
        /// Offending raster.
        path: Utf8PathBuf,
        /// Description of the layout.
        message: String,
    },
}

impl RasterError {
    /// Report whether the error means the raster can never be sampled.
    ///
    /// Configuration errors are fatal for every request; other errors only
    /// affect the current sample.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingGeoreference { .. } | Self::UnsupportedSampleFormat { .. }
        )
    }
}

impl From<RasterError> for DensityError {
    fn from(err: RasterError) -> Self {
        let message = err.to_string();
        if err.is_configuration() {
            Self::Configuration { message }
        } else {
            Self::Read { message }
        }
    }
}
