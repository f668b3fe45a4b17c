//! Score command implementation for the Sitewise CLI.

use std::io::Write;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use sitewise_core::{
    BandThresholds, ScoreCombiner, ScoreRequest, ScoreWeights, ScoringBounds, SignalRange,
    SignalSet, SuitabilityBand,
};
use sitewise_data::overpass::{OverpassConfig, OverpassFeatureSource, RetryPolicy};
use sitewise_data::raster::GeoTiffDensitySource;
use sitewise_data::routing::{OrsConfig, OrsProximitySource};
use sitewise_scorer::{ScorerConfig, SignalTimeouts, SiteAssessment, SiteScorer};

use crate::{
    ARG_ACCESSIBILITY_WEIGHT, ARG_CATEGORY, ARG_COMPETITION_WEIGHT, ARG_COMPLEMENTARY_WEIGHT,
    ARG_COMPETITORS_MAX, ARG_COMPETITORS_MIN, ARG_COMPETITORS_TIMEOUT_SECS,
    ARG_COMPLEMENTARY_TIMEOUT_SECS, ARG_DEADLINE_SECS, ARG_FALLBACK_DISTANCE, ARG_LAT, ARG_LON,
    ARG_LOWER_THRESHOLD, ARG_MAX_COMPLEMENTARY, ARG_MAX_PROXIMITY_DISTANCE, ARG_ORS_API_KEY,
    ARG_ORS_PROFILE, ARG_ORS_URL, ARG_OVERPASS_URL, ARG_POPULATION_MAX, ARG_POPULATION_MIN,
    ARG_POPULATION_TIMEOUT_SECS, ARG_POPULATION_WEIGHT, ARG_PROXIMITY_TIMEOUT_SECS, ARG_RADIUS,
    ARG_RASTER, ARG_RETRY_ATTEMPTS, ARG_RETRY_DELAY_MS, ARG_SERVER_TIMEOUT_SECS,
    ARG_UPPER_THRESHOLD, ARG_USER_AGENT, CliError, ENV_CATEGORY, ENV_LAT, ENV_LON, ENV_RADIUS, ENV_RASTER,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "score",
    long_about = "Score a location for a business category by combining \
                 population density from a GeoTIFF raster, competitor and \
                 complementary counts from Overpass, and distance to the road \
                 network from OpenRouteService. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Score a candidate site"
)]
#[ortho_config(prefix = "SITEWISE")]
pub(crate) struct ScoreArgs {
    /// Latitude of the site in degrees.
    #[arg(long = ARG_LAT, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the site in degrees.
    #[arg(long = ARG_LON, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Business category, e.g. "restaurant" or "Coffee Shop".
    #[arg(long = ARG_CATEGORY, value_name = "name")]
    #[serde(default)]
    pub(crate) category: Option<String>,
    /// Path to the population density GeoTIFF.
    #[arg(long = ARG_RASTER, value_name = "path")]
    #[serde(default)]
    pub(crate) raster: Option<Utf8PathBuf>,
    /// Overpass interpreter endpoint.
    #[arg(long = ARG_OVERPASS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) overpass_url: Option<String>,
    /// OpenRouteService root URL.
    #[arg(long = ARG_ORS_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) ors_url: Option<String>,
    /// OpenRouteService API key; without it the fallback distance is used.
    #[arg(long = ARG_ORS_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) ors_api_key: Option<String>,
    /// OpenRouteService routing profile.
    #[arg(long = ARG_ORS_PROFILE, value_name = "profile")]
    #[serde(default)]
    pub(crate) ors_profile: Option<String>,
    /// Distance assumed when the road network cannot be measured.
    #[arg(long = ARG_FALLBACK_DISTANCE, value_name = "metres")]
    #[serde(default)]
    pub(crate) fallback_distance: Option<f64>,
    /// User agent sent to upstream services.
    #[arg(long = ARG_USER_AGENT, value_name = "agent")]
    #[serde(default)]
    pub(crate) user_agent: Option<String>,
    /// Total Overpass attempts per query.
    #[arg(long = ARG_RETRY_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) retry_attempts: Option<u32>,
    /// Delay before the first Overpass retry, in milliseconds.
    #[arg(long = ARG_RETRY_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) retry_delay_ms: Option<u64>,
    /// Overall request deadline in seconds.
    #[arg(long = ARG_DEADLINE_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) deadline_secs: Option<u64>,
    /// Time limit for the raster sample, in seconds.
    #[arg(long = ARG_POPULATION_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) population_timeout_secs: Option<u64>,
    /// Time limit for the competitor query, retries included, in seconds.
    #[arg(long = ARG_COMPETITORS_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) competitors_timeout_secs: Option<u64>,
    /// Time limit for the complementary query, retries included, in seconds.
    #[arg(long = ARG_COMPLEMENTARY_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) complementary_timeout_secs: Option<u64>,
    /// Time limit for the road-network lookup, in seconds.
    #[arg(long = ARG_PROXIMITY_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) proximity_timeout_secs: Option<u64>,
    /// `[timeout:N]` value sent inside every Overpass query.
    #[arg(long = ARG_SERVER_TIMEOUT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) server_timeout_secs: Option<u32>,
    /// Weight of population density.
    #[arg(long = ARG_POPULATION_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) population_weight: Option<f64>,
    /// Weight of the competition signal.
    #[arg(long = ARG_COMPETITION_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) competition_weight: Option<f64>,
    /// Weight of network accessibility.
    #[arg(long = ARG_ACCESSIBILITY_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) accessibility_weight: Option<f64>,
    /// Weight of complementary features.
    #[arg(long = ARG_COMPLEMENTARY_WEIGHT, value_name = "weight")]
    #[serde(default)]
    pub(crate) complementary_weight: Option<f64>,
    /// Population density mapped to a zero population signal.
    #[arg(long = ARG_POPULATION_MIN, value_name = "density")]
    #[serde(default)]
    pub(crate) population_min: Option<f64>,
    /// Population density that saturates the population signal.
    #[arg(long = ARG_POPULATION_MAX, value_name = "density")]
    #[serde(default)]
    pub(crate) population_max: Option<f64>,
    /// Competitor count at or below which competition has no effect.
    #[arg(long = ARG_COMPETITORS_MIN, value_name = "count")]
    #[serde(default)]
    pub(crate) competitors_min: Option<f64>,
    /// Competitor count at which the competition effect bottoms out.
    #[arg(long = ARG_COMPETITORS_MAX, value_name = "count")]
    #[serde(default)]
    pub(crate) competitors_max: Option<f64>,
    /// Distance at which accessibility reaches zero.
    #[arg(long = ARG_MAX_PROXIMITY_DISTANCE, value_name = "metres")]
    #[serde(default)]
    pub(crate) max_proximity_distance: Option<f64>,
    /// Complementary count that saturates the complementary signal.
    #[arg(long = ARG_MAX_COMPLEMENTARY, value_name = "count")]
    #[serde(default)]
    pub(crate) max_complementary: Option<f64>,
    /// Lowest score rated "Moderate".
    #[arg(long = ARG_LOWER_THRESHOLD, value_name = "score")]
    #[serde(default)]
    pub(crate) lower_threshold: Option<f64>,
    /// Lowest score rated "Highly Suitable".
    #[arg(long = ARG_UPPER_THRESHOLD, value_name = "score")]
    #[serde(default)]
    pub(crate) upper_threshold: Option<f64>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone)]
pub(crate) struct ScoreConfig {
    /// Site being scored.
    pub(crate) request: ScoreRequest,
    /// Population density GeoTIFF.
    pub(crate) raster: Utf8PathBuf,
    /// Overpass client settings.
    pub(crate) overpass: OverpassConfig,
    /// OpenRouteService client settings.
    pub(crate) ors: OrsConfig,
    /// Orchestration settings.
    pub(crate) scorer: ScorerConfig,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.raster, ARG_RASTER)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn file_is_file(path: &Utf8Path) -> std::io::Result<bool> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path
        .file_name()
        .ok_or_else(|| std::io::Error::other("path should include a file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_LON,
        })?;
        let radius = args.radius.ok_or(CliError::MissingArgument {
            field: ARG_RADIUS,
            env: ENV_RADIUS,
        })?;
        let category = args.category.ok_or(CliError::MissingArgument {
            field: ARG_CATEGORY,
            env: ENV_CATEGORY,
        })?;
        let raster = args.raster.ok_or(CliError::MissingArgument {
            field: ARG_RASTER,
            env: ENV_RASTER,
        })?;

        let default_weights = ScoreWeights::default();
        let weights = ScoreWeights {
            population: args.population_weight.unwrap_or(default_weights.population),
            competition: args.competition_weight.unwrap_or(default_weights.competition),
            accessibility: args
                .accessibility_weight
                .unwrap_or(default_weights.accessibility),
            complementary: args
                .complementary_weight
                .unwrap_or(default_weights.complementary),
        };
        let default_bounds = ScoringBounds::default();
        let bounds = ScoringBounds {
            population: SignalRange::new(
                args.population_min.unwrap_or(default_bounds.population.min),
                args.population_max.unwrap_or(default_bounds.population.max),
            ),
            competitors: SignalRange::new(
                args.competitors_min.unwrap_or(default_bounds.competitors.min),
                args.competitors_max.unwrap_or(default_bounds.competitors.max),
            ),
            max_proximity_distance_meters: args
                .max_proximity_distance
                .unwrap_or(default_bounds.max_proximity_distance_meters),
            max_complementary_count: args
                .max_complementary
                .unwrap_or(default_bounds.max_complementary_count),
        };
        let default_thresholds = BandThresholds::default();
        let thresholds = BandThresholds::new(
            args.lower_threshold.unwrap_or(default_thresholds.lower()),
            args.upper_threshold.unwrap_or(default_thresholds.upper()),
        )?;
        let combiner = ScoreCombiner::new(bounds, weights, thresholds)?;

        let mut overpass = OverpassConfig::default();
        if let Some(url) = args.overpass_url {
            overpass.url = url;
        }
        let default_retry = overpass.retry;
        overpass.retry = RetryPolicy::new(
            args.retry_attempts.unwrap_or(default_retry.max_attempts),
            args.retry_delay_ms
                .map_or(default_retry.base_delay, Duration::from_millis),
        );

        let mut ors = OrsConfig::default();
        if let Some(url) = args.ors_url {
            ors.base_url = url;
        }
        if let Some(key) = args.ors_api_key {
            ors = ors.with_api_key(key);
        }
        if let Some(profile) = args.ors_profile {
            ors = ors.with_profile(profile);
        }
        if let Some(metres) = args.fallback_distance {
            ors = ors.with_fallback_distance(metres);
        }
        if let Some(agent) = args.user_agent {
            overpass = overpass.with_user_agent(agent.clone());
            ors = ors.with_user_agent(agent);
        }

        let default_timeouts = SignalTimeouts::default();
        let seconds_or = |secs: Option<u64>, default: Duration| {
            secs.map_or(default, Duration::from_secs)
        };
        let timeouts = SignalTimeouts {
            population: seconds_or(args.population_timeout_secs, default_timeouts.population),
            competitors: seconds_or(args.competitors_timeout_secs, default_timeouts.competitors),
            complementary: seconds_or(
                args.complementary_timeout_secs,
                default_timeouts.complementary,
            ),
            proximity: seconds_or(args.proximity_timeout_secs, default_timeouts.proximity),
            request: seconds_or(args.deadline_secs, default_timeouts.request),
        };
        let mut scorer = ScorerConfig::default()
            .with_combiner(combiner)
            .with_timeouts(timeouts);
        if let Some(secs) = args.server_timeout_secs {
            scorer = scorer.with_server_timeout(secs);
        }

        Ok(Self {
            request: ScoreRequest::new(lat, lon, radius, category),
            raster,
            overpass,
            ors,
            scorer,
        })
    }
}

/// Produces a [`SiteAssessment`] for a resolved configuration.
pub(crate) trait SiteAssessor {
    fn assess(&self, config: &ScoreConfig) -> Result<SiteAssessment, CliError>;
}

/// Assessor wired to the GeoTIFF, Overpass and OpenRouteService sources.
pub(crate) struct LiveSiteAssessor;

impl SiteAssessor for LiveSiteAssessor {
    fn assess(&self, config: &ScoreConfig) -> Result<SiteAssessment, CliError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(CliError::StartRuntime)?;
        let scorer = SiteScorer::new(
            GeoTiffDensitySource::new(config.raster.clone()),
            OverpassFeatureSource::with_config(config.overpass.clone())?,
            OrsProximitySource::with_config(config.ors.clone())?,
            config.scorer.clone(),
        );
        Ok(runtime.block_on(scorer.assess(&config.request))?)
    }
}

/// JSON body printed by the `score` command.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub(crate) struct ScoreOutput {
    pub(crate) result: SuitabilityBand,
    pub(crate) score: f64,
    pub(crate) raw_score: f64,
    pub(crate) category: String,
    pub(crate) signals: SignalSet,
}

impl From<SiteAssessment> for ScoreOutput {
    fn from(assessment: SiteAssessment) -> Self {
        Self {
            result: assessment.result.band,
            score: assessment.result.score,
            raw_score: assessment.result.raw_score,
            category: assessment.category.as_str().to_owned(),
            signals: assessment.signals,
        }
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &LiveSiteAssessor, &mut stdout)
}

pub(crate) fn run_score_with(
    args: ScoreArgs,
    assessor: &dyn SiteAssessor,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_score_config(args)?;
    let assessment = assessor.assess(&config)?;
    info!(
        "{} at ({}, {}): {}",
        assessment.category,
        config.request.lat(),
        config.request.lon(),
        assessment.result.band
    );
    write_score_output(writer, &ScoreOutput::from(assessment))
}

fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

fn write_score_output(writer: &mut dyn Write, output: &ScoreOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
