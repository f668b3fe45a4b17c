//! Unit coverage for the orchestration policy.
#![forbid(unsafe_code)]

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use rstest::rstest;
use sitewise_core::test_support::{StubDensitySource, StubFeatureSource, StubProximitySource};
use sitewise_core::{
    CategoryProfiles, DensityError, ElementType, FeatureCount, FeatureElement, FeatureQuery,
    FeatureQueryError, FeatureSource, ScoreRequest, SignalSet, SuitabilityBand,
};
use tokio_util::sync::CancellationToken;

use crate::{ScoreError, ScorerConfig, SignalTimeouts, SiteScorer};

const COMPETITOR_NEEDLE: &str = r#"["amenity"="restaurant"]"#;
const COMPLEMENTARY_NEEDLE: &str = r#"["office"]"#;

type StubScorer = SiteScorer<StubDensitySource, StubFeatureSource, StubProximitySource>;

fn found(count: u64) -> Result<FeatureCount, FeatureQueryError> {
    Ok(FeatureCount::from_elements(
        (0..count).map(|id| FeatureElement::bare(ElementType::Node, id)),
    ))
}

fn restaurant() -> ScoreRequest {
    ScoreRequest::new(37.4221, -122.0841, 1000.0, "Restaurant")
}

fn reference_features() -> StubFeatureSource {
    StubFeatureSource::default()
        .with_rule(COMPETITOR_NEEDLE, found(2))
        .with_rule(COMPLEMENTARY_NEEDLE, found(8))
}

fn scorer(density: StubDensitySource, features: StubFeatureSource) -> StubScorer {
    SiteScorer::new(
        density,
        features,
        StubProximitySource::new(50.0, 1200.0),
        ScorerConfig::default(),
    )
}

/// Feature source keeping every cancellation token it is handed.
#[derive(Debug, Default)]
struct TokenRecordingSource {
    delay: Option<Duration>,
    tokens: Mutex<Vec<CancellationToken>>,
}

impl TokenRecordingSource {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn tokens(&self) -> Vec<CancellationToken> {
        self.tokens.lock().expect("tokens lock").clone()
    }
}

#[async_trait]
impl FeatureSource for TokenRecordingSource {
    async fn fetch(
        &self,
        _query: &FeatureQuery,
        cancel: &CancellationToken,
    ) -> Result<FeatureCount, FeatureQueryError> {
        self.tokens.lock().expect("tokens lock").push(cancel.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(FeatureCount::empty())
    }
}

fn short_timeouts() -> SignalTimeouts {
    SignalTimeouts {
        population: Duration::from_secs(2),
        competitors: Duration::from_secs(2),
        complementary: Duration::from_secs(2),
        proximity: Duration::from_secs(2),
        request: Duration::from_secs(5),
    }
}

#[rstest]
#[expect(clippy::float_arithmetic, reason = "score comparison needs a tolerance")]
#[tokio::test]
async fn reference_site_is_moderate() {
    let scorer = scorer(StubDensitySource::value(1500.0), reference_features());

    let assessment = scorer.assess(&restaurant()).await.expect("score");

    assert_eq!(
        assessment.signals,
        SignalSet {
            population_density: 1500.0,
            competitor_count: 2,
            proximity_distance_meters: 50.0,
            complementary_count: 8,
        }
    );
    assert_eq!(assessment.category.as_str(), "restaurant");
    assert!((assessment.result.raw_score - 0.5855).abs() < 1e-9);
    assert_eq!(assessment.result.band, SuitabilityBand::Moderate);
}

#[rstest]
#[case::outside_coverage(StubDensitySource::none())]
#[case::read_failure(StubDensitySource::error(DensityError::Read {
    message: "truncated strip".to_owned(),
}))]
#[tokio::test]
async fn population_degrades_to_zero(#[case] density: StubDensitySource) {
    let scorer = scorer(density, reference_features());

    let assessment = scorer.assess(&restaurant()).await.expect("score");

    assert_eq!(assessment.signals.population_density, 0.0);
}

#[rstest]
#[tokio::test]
async fn configuration_errors_are_fatal() {
    let density = StubDensitySource::error(DensityError::Configuration {
        message: "no georeference".to_owned(),
    });
    let scorer = scorer(density, reference_features());

    let err = scorer.score(&restaurant()).await.expect_err("should fail");

    assert!(matches!(err, ScoreError::Configuration { .. }), "{err:?}");
}

#[rstest]
#[tokio::test]
async fn competitor_failure_is_fatal() {
    let features = StubFeatureSource::default().with_rule(
        COMPETITOR_NEEDLE,
        Err(FeatureQueryError::Permanent {
            status: 400,
            message: "parse error".to_owned(),
        }),
    );
    let scorer = scorer(StubDensitySource::value(1500.0), features);

    let err = scorer.score(&restaurant()).await.expect_err("should fail");

    assert!(
        matches!(
            err,
            ScoreError::UpstreamUnavailable {
                source: FeatureQueryError::Permanent { status: 400, .. }
            }
        ),
        "{err:?}"
    );
}

#[rstest]
#[tokio::test]
async fn complementary_failure_degrades_to_zero() {
    let features = StubFeatureSource::default()
        .with_rule(COMPETITOR_NEEDLE, found(2))
        .with_rule(
            COMPLEMENTARY_NEEDLE,
            Err(FeatureQueryError::Transient {
                attempts: 3,
                status: Some(503),
                message: "overloaded".to_owned(),
            }),
        );
    let scorer = scorer(StubDensitySource::value(1500.0), features);

    let assessment = scorer.assess(&restaurant()).await.expect("score");

    assert_eq!(assessment.signals.complementary_count, 0);
    assert_eq!(assessment.signals.competitor_count, 2);
}

#[rstest]
#[tokio::test]
async fn empty_profiles_skip_the_complementary_query() {
    let scorer = SiteScorer::new(
        StubDensitySource::value(1500.0),
        reference_features(),
        StubProximitySource::new(50.0, 1200.0),
        ScorerConfig::default().with_profiles(CategoryProfiles::new()),
    );

    let assessment = scorer.assess(&restaurant()).await.expect("score");

    let calls = scorer.feature_source().calls();
    assert_eq!(calls.len(), 1, "{calls:?}");
    assert!(calls.iter().all(|clauses| clauses.contains(COMPETITOR_NEEDLE)));
    assert_eq!(assessment.signals.complementary_count, 0);
}

#[rstest]
#[case::latitude(ScoreRequest::new(95.0, 0.0, 1000.0, "cafe"))]
#[case::longitude(ScoreRequest::new(0.0, -181.0, 1000.0, "cafe"))]
#[case::radius(ScoreRequest::new(0.0, 0.0, 0.0, "cafe"))]
#[case::not_a_number(ScoreRequest::new(f64::NAN, 0.0, 1000.0, "cafe"))]
#[tokio::test]
async fn invalid_requests_reach_no_upstream(#[case] request: ScoreRequest) {
    let scorer = scorer(StubDensitySource::value(1500.0), reference_features());

    let err = scorer.score(&request).await.expect_err("should fail");

    assert!(matches!(err, ScoreError::InvalidInput(_)), "{err:?}");
    assert!(scorer.feature_source().calls().is_empty());
    assert_eq!(scorer.proximity_source().calls(), 0);
}

#[rstest]
#[tokio::test]
async fn request_deadline_cancels_the_shared_token() {
    let timeouts = SignalTimeouts {
        competitors: Duration::from_secs(10),
        complementary: Duration::from_secs(10),
        request: Duration::from_millis(50),
        ..short_timeouts()
    };
    let scorer = SiteScorer::new(
        StubDensitySource::value(1500.0),
        TokenRecordingSource::with_delay(Duration::from_secs(5)),
        StubProximitySource::new(50.0, 1200.0),
        ScorerConfig::default().with_timeouts(timeouts),
    );

    let err = scorer.score(&restaurant()).await.expect_err("should time out");

    assert!(
        matches!(err, ScoreError::RequestTimeout { deadline } if deadline == Duration::from_millis(50)),
        "{err:?}"
    );
    let tokens = scorer.feature_source().tokens();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(CancellationToken::is_cancelled));
}

#[rstest]
#[tokio::test]
async fn token_is_cancelled_once_scoring_completes() {
    let scorer = SiteScorer::new(
        StubDensitySource::value(1500.0),
        TokenRecordingSource::default(),
        StubProximitySource::new(50.0, 1200.0),
        ScorerConfig::default(),
    );

    scorer.assess(&restaurant()).await.expect("score");

    let tokens = scorer.feature_source().tokens();
    assert_eq!(tokens.len(), 2);
    assert!(tokens.iter().all(CancellationToken::is_cancelled));
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
#[tokio::test]
async fn blank_category_scores_with_the_generic_profile(#[case] category: &str) {
    let scorer = scorer(StubDensitySource::value(1500.0), StubFeatureSource::default());
    let request = ScoreRequest::new(37.4221, -122.0841, 1000.0, category);

    let assessment = scorer.assess(&request).await.expect("blank category should score");

    assert!(assessment.category.is_generic());
    let calls = scorer.feature_source().calls();
    assert_eq!(calls.len(), 2, "{calls:?}");
    assert!(calls.iter().any(|clauses| clauses.contains(r#"["amenity"="generic"]"#)));
    assert!(
        calls
            .iter()
            .any(|clauses| clauses.contains(r#"["public_transport"="stop_position"]"#))
    );
}

#[rstest]
#[tokio::test]
async fn slow_competitor_query_is_fatal() {
    let features = reference_features().with_delay(Duration::from_secs(5));
    let timeouts = SignalTimeouts {
        competitors: Duration::from_millis(20),
        complementary: Duration::from_millis(20),
        ..short_timeouts()
    };
    let scorer = SiteScorer::new(
        StubDensitySource::value(1500.0),
        features,
        StubProximitySource::new(50.0, 1200.0),
        ScorerConfig::default().with_timeouts(timeouts),
    );

    let err = scorer.score(&restaurant()).await.expect_err("should fail");

    assert!(matches!(err, ScoreError::UpstreamTimeout { .. }), "{err:?}");
}

#[rstest]
#[tokio::test]
async fn slow_proximity_uses_fallback_distance() {
    let timeouts = SignalTimeouts {
        proximity: Duration::from_millis(20),
        ..short_timeouts()
    };
    let scorer = SiteScorer::new(
        StubDensitySource::value(1500.0),
        reference_features(),
        StubProximitySource::new(50.0, 1200.0).with_delay(Duration::from_secs(5)),
        ScorerConfig::default().with_timeouts(timeouts),
    );

    let assessment = scorer.assess(&restaurant()).await.expect("score");

    assert_eq!(assessment.signals.proximity_distance_meters, 1200.0);
}

#[rstest]
#[tokio::test]
async fn category_is_normalised_before_querying() {
    let scorer = scorer(StubDensitySource::value(1500.0), StubFeatureSource::default());
    let request = ScoreRequest::new(37.4221, -122.0841, 500.0, "  Petrol Station ");

    let assessment = scorer.assess(&request).await.expect("score");

    assert_eq!(assessment.category.as_str(), "fuel");
    let calls = scorer.feature_source().calls();
    assert!(
        calls
            .iter()
            .any(|clauses| clauses.contains(r#"node["amenity"="fuel"](around:500,"#)),
        "{calls:?}"
    );
}
