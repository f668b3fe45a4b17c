//! Test helpers for score CLI workspaces and stubbed assessments.

use camino::{Utf8Path, Utf8PathBuf};
use sitewise_core::test_support::{StubDensitySource, StubFeatureSource, StubProximitySource};
use sitewise_core::{ElementType, FeatureCount, FeatureElement, FeatureQueryError};
use sitewise_scorer::{SiteAssessment, SiteScorer};
use tempfile::TempDir;

use crate::CliError;
use crate::score::{ScoreArgs, ScoreConfig, SiteAssessor};

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture file");
}

/// Temporary directory holding a placeholder raster.
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn raster(&self) -> Utf8PathBuf {
        let path = self.root.join("population.tif");
        write_utf8(&path, b"raster");
        path
    }
}

/// Arguments for the reference restaurant site with every required field.
pub(super) fn complete_args(raster: Utf8PathBuf) -> ScoreArgs {
    ScoreArgs {
        lat: Some(37.4221),
        lon: Some(-122.0841),
        radius: Some(1000.0),
        category: Some("restaurant".to_owned()),
        raster: Some(raster),
        ..ScoreArgs::default()
    }
}

fn found(count: u64) -> Result<FeatureCount, FeatureQueryError> {
    Ok(FeatureCount::from_elements(
        (0..count).map(|id| FeatureElement::bare(ElementType::Node, id)),
    ))
}

/// Scores with in-memory sources reproducing the reference site.
pub(super) struct StubSiteAssessor;

impl SiteAssessor for StubSiteAssessor {
    fn assess(&self, config: &ScoreConfig) -> Result<SiteAssessment, CliError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CliError::StartRuntime)?;
        let features = StubFeatureSource::default()
            .with_rule(r#"["amenity"="restaurant"]"#, found(2))
            .with_fallback(found(8));
        let scorer = SiteScorer::new(
            StubDensitySource::value(1500.0),
            features,
            StubProximitySource::new(50.0, 1200.0),
            config.scorer.clone(),
        );
        Ok(runtime.block_on(scorer.assess(&config.request))?)
    }
}
