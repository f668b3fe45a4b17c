//! Error types emitted by the Sitewise CLI.
//!
//! Keep this error type reasonably small, as CLI helpers return
//! `Result<_, CliError>` throughout.

use std::sync::Arc;

use camino::Utf8PathBuf;
use sitewise_core::ConfigError;
use sitewise_data::ClientBuildError;
use sitewise_scorer::ScoreError;
use thiserror::Error;

/// Errors emitted by the Sitewise CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Weights, bounds or thresholds were rejected.
    #[error("invalid scoring configuration: {0}")]
    InvalidScoring(#[from] ConfigError),
    /// An upstream HTTP client could not be constructed.
    #[error(transparent)]
    BuildClient(#[from] ClientBuildError),
    /// The async runtime failed to start.
    #[error("failed to start async runtime: {0}")]
    StartRuntime(#[source] std::io::Error),
    /// Scoring the site failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// Serializing the score output failed.
    #[error("failed to serialize score output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the score output failed.
    #[error("failed to write score output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
