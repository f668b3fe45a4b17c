//! Behavioural tests for category profiles and [`FeatureQuery`] composition.

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitewise_core::{CategoryProfiles, FeatureQuery, normalise_category};
use std::cell::RefCell;

/// World state shared by query-building scenarios.
#[derive(Debug, Default)]
struct QueryWorld {
    profiles: RefCell<Option<CategoryProfiles>>,
    query: RefCell<Option<FeatureQuery>>,
}

impl QueryWorld {
    fn clauses(&self) -> String {
        self.query
            .borrow()
            .as_ref()
            .expect("a query should be built")
            .clauses()
            .to_owned()
    }
}

#[fixture]
fn world() -> QueryWorld {
    QueryWorld::default()
}

#[given("the default category profiles")]
fn default_profiles(world: &QueryWorld) {
    world.profiles.replace(Some(CategoryProfiles::default()));
}

#[given("an empty category profile table")]
fn empty_profiles(world: &QueryWorld) {
    world.profiles.replace(Some(CategoryProfiles::new()));
}

#[when("I build the complementary query for {category} at {lat}, {lon} within {radius} metres")]
fn build_complementary(world: &QueryWorld, category: String, lat: f64, lon: f64, radius: f64) {
    let profiles = world.profiles.borrow();
    let profiles = profiles.as_ref().expect("profiles should be configured");
    let key = normalise_category(&category);
    let query = FeatureQuery::from_profile(
        profiles.complementary_profile(&key),
        Coord { x: lon, y: lat },
        radius,
    );
    world.query.replace(Some(query));
}

#[when("I build the competitor query for {category} at {lat}, {lon} within {radius} metres")]
fn build_competitor(world: &QueryWorld, category: String, lat: f64, lon: f64, radius: f64) {
    let profiles = world.profiles.borrow();
    let profiles = profiles.as_ref().expect("profiles should be configured");
    let key = normalise_category(&category);
    let query = FeatureQuery::single(
        &profiles.competitor_clause(&key),
        Coord { x: lon, y: lat },
        radius,
    );
    world.query.replace(Some(query));
}

#[then("the query has {count} statements")]
fn statement_count(world: &QueryWorld, count: usize) {
    assert_eq!(world.clauses().matches(';').count(), count);
}

#[then("every statement ends with {suffix}")]
fn statements_share_filter(world: &QueryWorld, suffix: String) {
    let clauses = world.clauses();
    let statements: Vec<&str> = clauses.split_inclusive(';').collect();
    assert!(!statements.is_empty(), "expected statements in {clauses}");
    for statement in statements {
        assert!(
            statement.ends_with(suffix.as_str()),
            "statement {statement} lacks {suffix}"
        );
    }
}

#[then("the query is empty")]
fn query_is_empty(world: &QueryWorld) {
    let query = world.query.borrow();
    assert!(query.as_ref().is_some_and(FeatureQuery::is_empty));
}

#[then("the query contains {fragment}")]
fn query_contains(world: &QueryWorld, fragment: String) {
    let clauses = world.clauses();
    assert!(clauses.contains(&fragment), "{clauses} lacks {fragment}");
}

#[scenario(path = "tests/features/query_builder.feature", index = 0)]
fn builtin_profile(world: QueryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/query_builder.feature", index = 1)]
fn empty_table(world: QueryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/query_builder.feature", index = 2)]
fn generic_fallback(world: QueryWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/query_builder.feature", index = 3)]
fn competitor_synonyms(world: QueryWorld) {
    let _ = world;
}
