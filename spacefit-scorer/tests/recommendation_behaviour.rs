//! Behavioural coverage for baseline scoring and facility ranking.

use std::cell::RefCell;
use std::sync::Arc;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use spacefit_core::{
    AnalysisConfig, CategoryCode, ExistingFacilities, Grade, PoiCollection, PointOfInterest,
};
use spacefit_scorer::{
    BaselineScorer, BaselineScores, DEFAULT_REASON, IndicatorCalculator,
    PublicFacilityRecommender, Recommendation, poi_penalty,
};

const TIED_RULES: &str = "
indicators:
  transportation:
    categories: [SW8]
    weights: { SW8: 3.0 }
facility_rules:
  bus_depot:
    description: Bus depot
    indicator_weights: { transportation: 1.0 }
  park_and_ride:
    description: Park and ride
    indicator_weights: { transportation: 1.0 }
";

/// Scores produced by the `When` step.
#[derive(Debug)]
pub struct ScoredArea {
    baseline: BaselineScores,
    recommendations: Vec<Recommendation>,
}

/// Configuration shared by the steps of a scenario.
#[fixture]
pub fn config() -> RefCell<Option<Arc<AnalysisConfig>>> {
    RefCell::new(None)
}

/// POIs around the analysed location.
#[fixture]
pub fn pois() -> RefCell<PoiCollection> {
    RefCell::new(PoiCollection::with_all_groups())
}

/// Outcome of scoring the area.
#[fixture]
pub fn scored() -> RefCell<Option<ScoredArea>> {
    RefCell::new(None)
}

/// Outcome of a direct penalty computation.
#[fixture]
pub fn penalty() -> RefCell<Option<f64>> {
    RefCell::new(None)
}

fn poi_at(category: CategoryCode, distance_m: f64) -> PointOfInterest {
    PointOfInterest::new("poi", category, Coord { x: 126.978, y: 37.5665 }, distance_m)
}

fn with_scored<T>(scored: &RefCell<Option<ScoredArea>>, f: impl FnOnce(&ScoredArea) -> T) -> T {
    let borrow = scored.borrow();
    let Some(area) = borrow.as_ref() else {
        panic!("the area must be scored first");
    };
    f(area)
}

#[given("the shipped scoring configuration")]
fn shipped(config: &RefCell<Option<Arc<AnalysisConfig>>>) {
    *config.borrow_mut() = Some(Arc::new(AnalysisConfig::default()));
}

#[given("a configuration with bus_depot and park_and_ride weighted equally")]
fn tied(config: &RefCell<Option<Arc<AnalysisConfig>>>) {
    let parsed = AnalysisConfig::from_yaml_str(TIED_RULES)
        .unwrap_or_else(|err| panic!("tied rules should parse: {err}"));
    *config.borrow_mut() = Some(Arc::new(parsed));
}

#[given("an area with no points of interest")]
fn empty_area(pois: &RefCell<PoiCollection>) {
    *pois.borrow_mut() = PoiCollection::with_all_groups();
}

#[given("a hospital {distance} metres away")]
fn hospital(pois: &RefCell<PoiCollection>, distance: f64) {
    pois.borrow_mut().push(poi_at(CategoryCode::Hospital, distance));
}

#[given("a subway station {distance} metres away")]
fn subway(pois: &RefCell<PoiCollection>, distance: f64) {
    pois.borrow_mut()
        .push(poi_at(CategoryCode::SubwayStation, distance));
}

#[when("the area is scored")]
fn score_area(
    config: &RefCell<Option<Arc<AnalysisConfig>>>,
    pois: &RefCell<PoiCollection>,
    scored: &RefCell<Option<ScoredArea>>,
) {
    let shared = config
        .borrow()
        .clone()
        .unwrap_or_else(|| panic!("configuration must be initialised"));
    let area = pois.borrow();
    let indicators = IndicatorCalculator::new(Arc::clone(&shared)).calculate(&area);
    let baseline = BaselineScorer::from_config(&shared).score(&area);
    let recommendations = PublicFacilityRecommender::new(shared).recommend(
        &indicators,
        &area,
        &ExistingFacilities::new(),
    );
    *scored.borrow_mut() = Some(ScoredArea {
        baseline,
        recommendations,
    });
}

#[when("{count} competing POIs are counted against a penalty weight of {weight}")]
fn count_penalty(penalty: &RefCell<Option<f64>>, count: usize, weight: f64) {
    *penalty.borrow_mut() = Some(poi_penalty(count, weight));
}

#[then("the baseline grade is F")]
fn grade_f(scored: &RefCell<Option<ScoredArea>>) {
    with_scored(scored, |area| {
        assert_eq!(area.baseline.total_score, 0.0);
        assert_eq!(area.baseline.grade, Grade::F);
    });
}

#[then("every recommendation scores 0 with the default reason")]
fn all_zero(scored: &RefCell<Option<ScoredArea>>) {
    with_scored(scored, |area| {
        assert_eq!(area.recommendations.len(), 5);
        for rec in &area.recommendations {
            assert_eq!(rec.score, 0.0, "{} should score zero", rec.facility_type);
            assert_eq!(rec.reason, DEFAULT_REASON);
        }
    });
}

#[then("the living aggregate is {expected}")]
fn living(scored: &RefCell<Option<ScoredArea>>, expected: f64) {
    with_scored(scored, |area| assert_eq!(area.baseline.living, expected));
}

#[then("the ranking starts with {first} then {second}")]
fn ranking(scored: &RefCell<Option<ScoredArea>>, first: String, second: String) {
    with_scored(scored, |area| {
        let ranked: Vec<_> = area
            .recommendations
            .iter()
            .map(|rec| (rec.rank, rec.facility_type.as_str()))
            .collect();
        assert_eq!(ranked, [(1, first.as_str()), (2, second.as_str())]);
    });
}

#[then("both score the same")]
fn same_score(scored: &RefCell<Option<ScoredArea>>) {
    with_scored(scored, |area| {
        let scores: Vec<f64> = area.recommendations.iter().map(|rec| rec.score).collect();
        assert_eq!(scores, [6.0, 6.0]);
    });
}

#[then("the POI penalty is {expected}")]
fn penalty_is(penalty: &RefCell<Option<f64>>, expected: f64) {
    assert_eq!(*penalty.borrow(), Some(expected));
}

#[scenario(path = "tests/features/recommendation.feature", index = 0)]
fn empty_area_scores_zero(
    config: RefCell<Option<Arc<AnalysisConfig>>>,
    pois: RefCell<PoiCollection>,
    scored: RefCell<Option<ScoredArea>>,
    penalty: RefCell<Option<f64>>,
) {
    let _ = (config, pois, scored, penalty);
}

#[scenario(path = "tests/features/recommendation.feature", index = 1)]
fn hospital_feeds_living(
    config: RefCell<Option<Arc<AnalysisConfig>>>,
    pois: RefCell<PoiCollection>,
    scored: RefCell<Option<ScoredArea>>,
    penalty: RefCell<Option<f64>>,
) {
    let _ = (config, pois, scored, penalty);
}

#[scenario(path = "tests/features/recommendation.feature", index = 2)]
fn ties_keep_configuration_order(
    config: RefCell<Option<Arc<AnalysisConfig>>>,
    pois: RefCell<PoiCollection>,
    scored: RefCell<Option<ScoredArea>>,
    penalty: RefCell<Option<f64>>,
) {
    let _ = (config, pois, scored, penalty);
}

#[scenario(path = "tests/features/recommendation.feature", index = 3)]
fn penalty_is_capped(
    config: RefCell<Option<Arc<AnalysisConfig>>>,
    pois: RefCell<PoiCollection>,
    scored: RefCell<Option<ScoredArea>>,
    penalty: RefCell<Option<f64>>,
) {
    let _ = (config, pois, scored, penalty);
}
