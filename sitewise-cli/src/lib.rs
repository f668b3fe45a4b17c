//! Command-line interface for Sitewise site scoring.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod score;

pub use error::CliError;

use score::{ScoreArgs, run_score};

pub(crate) const ARG_LAT: &str = "lat";
pub(crate) const ARG_LON: &str = "lon";
pub(crate) const ARG_RADIUS: &str = "radius";
pub(crate) const ARG_CATEGORY: &str = "category";
pub(crate) const ARG_RASTER: &str = "raster";
pub(crate) const ARG_OVERPASS_URL: &str = "overpass-url";
pub(crate) const ARG_ORS_URL: &str = "ors-url";
pub(crate) const ARG_ORS_API_KEY: &str = "ors-api-key";
pub(crate) const ARG_ORS_PROFILE: &str = "ors-profile";
pub(crate) const ARG_FALLBACK_DISTANCE: &str = "fallback-distance";
pub(crate) const ARG_USER_AGENT: &str = "user-agent";
pub(crate) const ARG_RETRY_ATTEMPTS: &str = "retry-attempts";
pub(crate) const ARG_RETRY_DELAY_MS: &str = "retry-delay-ms";
pub(crate) const ARG_DEADLINE_SECS: &str = "deadline-secs";
pub(crate) const ARG_POPULATION_TIMEOUT_SECS: &str = "population-timeout-secs";
pub(crate) const ARG_COMPETITORS_TIMEOUT_SECS: &str = "competitors-timeout-secs";
pub(crate) const ARG_COMPLEMENTARY_TIMEOUT_SECS: &str = "complementary-timeout-secs";
pub(crate) const ARG_PROXIMITY_TIMEOUT_SECS: &str = "proximity-timeout-secs";
pub(crate) const ARG_SERVER_TIMEOUT_SECS: &str = "server-timeout-secs";
pub(crate) const ARG_POPULATION_WEIGHT: &str = "population-weight";
pub(crate) const ARG_COMPETITION_WEIGHT: &str = "competition-weight";
pub(crate) const ARG_ACCESSIBILITY_WEIGHT: &str = "accessibility-weight";
pub(crate) const ARG_COMPLEMENTARY_WEIGHT: &str = "complementary-weight";
pub(crate) const ARG_POPULATION_MIN: &str = "population-min";
pub(crate) const ARG_POPULATION_MAX: &str = "population-max";
pub(crate) const ARG_COMPETITORS_MIN: &str = "competitors-min";
pub(crate) const ARG_COMPETITORS_MAX: &str = "competitors-max";
pub(crate) const ARG_MAX_PROXIMITY_DISTANCE: &str = "max-proximity-distance";
pub(crate) const ARG_MAX_COMPLEMENTARY: &str = "max-complementary";
pub(crate) const ARG_LOWER_THRESHOLD: &str = "lower-threshold";
pub(crate) const ARG_UPPER_THRESHOLD: &str = "upper-threshold";
pub(crate) const ENV_LAT: &str = "SITEWISE_CMDS_SCORE_LAT";
pub(crate) const ENV_LON: &str = "SITEWISE_CMDS_SCORE_LON";
pub(crate) const ENV_RADIUS: &str = "SITEWISE_CMDS_SCORE_RADIUS";
pub(crate) const ENV_CATEGORY: &str = "SITEWISE_CMDS_SCORE_CATEGORY";
pub(crate) const ENV_RASTER: &str = "SITEWISE_CMDS_SCORE_RASTER";

/// Run the Sitewise CLI with the current process arguments and environment.
///
/// # Errors
/// Returns [`CliError`] when arguments, configuration or scoring fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse()?;
    match cli.command {
        Command::Score(args) => run_score(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "sitewise",
    about = "Site-suitability scoring from population, competition and access signals",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Score a candidate site for a business category.
    Score(ScoreArgs),
}

#[cfg(test)]
mod tests;
