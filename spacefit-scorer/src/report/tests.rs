use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use geo::Coord;
use rstest::{fixture, rstest};
use spacefit_core::{
    AnalysisConfig, AreaIndicators, CategoryCode, ExistingFacilities, ExistingFacility, Indicator,
    Location, PoiCollection, PointOfInterest,
};

use super::*;

fn analysed_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|date| date.and_hms_opt(9, 30, 0))
        .expect("valid timestamp")
}

fn rec(rank: usize, facility_type: &str, score: f64) -> Recommendation {
    Recommendation {
        rank,
        facility_type: facility_type.to_owned(),
        description: format!("{facility_type} description"),
        score,
        reason: "reason".to_owned(),
    }
}

fn indicators(entries: &[(Indicator, f64)]) -> AreaIndicators {
    entries.iter().copied().collect()
}

fn pois(category: CategoryCode, count: usize) -> PoiCollection {
    (0..count)
        .map(|_| PointOfInterest::new("poi", category, Coord { x: 127.0, y: 37.5 }, 100.0))
        .collect()
}

struct Fixture {
    generator: FacilityReportGenerator,
    location: Location,
}

impl Fixture {
    fn generate(
        &self,
        recommendations: &[Recommendation],
        indicators: &AreaIndicators,
        pois: &PoiCollection,
        existing: &ExistingFacilities,
    ) -> FacilityReport {
        self.generator.generate(&ReportInput {
            recommendations,
            indicators,
            pois,
            existing,
            location: &self.location,
            analysed_at: analysed_at(),
        })
    }
}

#[fixture]
fn fixture() -> Fixture {
    Fixture {
        generator: FacilityReportGenerator::new(Arc::new(AnalysisConfig::default())),
        location: Location::new("Sejong-daero 110, Jung-gu, Seoul", 37.5665, 126.978),
    }
}

#[rstest]
#[case(95.0, ReportGrade::S)]
#[case(90.0, ReportGrade::S)]
#[case(89.9, ReportGrade::APlus)]
#[case(70.0, ReportGrade::A)]
#[case(40.0, ReportGrade::C)]
#[case(39.9, ReportGrade::D)]
fn report_grades_have_half_open_bands(#[case] score: f64, #[case] expected: ReportGrade) {
    assert_eq!(ReportGrade::from_score(score), expected);
}

#[rstest]
fn empty_inputs_produce_defined_defaults(fixture: Fixture) {
    let report = fixture.generate(
        &[],
        &AreaIndicators::new(),
        &PoiCollection::with_all_groups(),
        &ExistingFacilities::new(),
    );

    assert_eq!(report.summary.analysis_date, "2026-10-18 09:30");
    assert!(report.summary.top_recommendation.is_none());
    assert!(report.summary.strongest_characteristic.is_none());
    assert!(report.detailed_recommendations.is_empty());
    assert!(report.comparative_analysis.top_vs_bottom.is_none());
    assert!(report.comparative_analysis.category_leaders.is_empty());
    assert_eq!(report.comparative_analysis.competitiveness.average_score, 0.0);
    assert_eq!(report.comparative_analysis.competitiveness.standard_deviation, 0.0);
    assert!(report.comparative_analysis.competitiveness.score_range.is_none());
    assert_eq!(report.scoring_breakdown.score_distribution, ScoreDistribution::default());
    assert_eq!(
        report.area_analysis.existing_facilities_status,
        ExistingFacilitiesStatus::NoData
    );
    assert_eq!(report.area_analysis.development_potential.score, 0.0);
    assert!(report.conclusion.primary_recommendation.is_none());
    assert_eq!(
        report.conclusion.key_considerations,
        ["gathering resident input is essential"]
    );
    assert_eq!(report.conclusion.next_steps.len(), NEXT_STEPS.len());
}

#[rstest]
#[case(&[(Indicator::ResidentialDemand, 40.0), (Indicator::CommercialVitality, 10.0)], LocationType::Residential)]
#[case(&[(Indicator::ResidentialDemand, 10.0), (Indicator::CommercialVitality, 31.0)], LocationType::Commercial)]
#[case(&[(Indicator::ResidentialDemand, 30.0), (Indicator::Transportation, 41.0)], LocationType::TransportHub)]
#[case(&[(Indicator::ResidentialDemand, 20.0), (Indicator::CommercialVitality, 20.0)], LocationType::Mixed)]
fn location_type_uses_raw_thresholds(
    fixture: Fixture,
    #[case] entries: &[(Indicator, f64)],
    #[case] expected: LocationType,
) {
    let report = fixture.generate(
        &[],
        &indicators(entries),
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    assert_eq!(report.area_analysis.location_type, expected);
}

#[rstest]
fn contributions_are_ordered_shares_of_the_base(fixture: Fixture) {
    let area = indicators(&[
        (Indicator::CommercialVitality, 20.0),
        (Indicator::Transportation, 50.0),
    ]);
    let report = fixture.generate(
        &[rec(1, "parking_lot", 42.0)],
        &area,
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );

    let detail = report
        .detailed_recommendations
        .first()
        .expect("parking lot detail");
    let rows = &detail.scoring_detail.indicator_contributions;
    assert_eq!(rows.len(), 2);
    let first = rows.first().expect("first contribution");
    let second = rows.last().expect("second contribution");
    assert_eq!(first.indicator, "transportation access");
    assert_eq!(first.contribution, 20.0);
    assert_eq!(first.percentage, 66.7);
    assert_eq!(second.percentage, 33.3);
    assert_eq!(detail.scoring_detail.base_score, 60.0);
    assert_eq!(detail.grade, ReportGrade::C);
}

#[rstest]
fn penalties_report_both_sources(fixture: Fixture) {
    let mut existing = ExistingFacilities::new();
    existing.push(ExistingFacility::new("Lot A", "공용주차장"));
    existing.push(ExistingFacility::new("Lot B", "주차장"));
    let report = fixture.generate(
        &[rec(1, "parking_lot", 30.0)],
        &indicators(&[(Indicator::Transportation, 50.0)]),
        &pois(CategoryCode::Parking, 5),
        &existing,
    );

    let detail = report
        .detailed_recommendations
        .first()
        .expect("parking lot detail");
    let penalties = &detail.scoring_detail.penalties;
    assert_eq!(penalties.details.len(), 2);
    let poi = penalties.details.first().expect("poi penalty");
    assert_eq!(poi.kind, PenaltyKind::NearbyPoi);
    assert_eq!(poi.penalty_percentage, 20.0);
    assert_eq!(poi.impact, Level::High);
    let recorded = penalties.details.last().expect("existing penalty");
    assert_eq!(recorded.kind, PenaltyKind::ExistingFacility);
    assert_eq!(recorded.penalty_percentage, 20.0);
    assert_eq!(recorded.impact, Level::Medium);
    assert_eq!(penalties.total_penalty_percentage, 40.0);
    assert_eq!(
        detail.feasibility.existing_facilities_impact,
        "existing facilities present"
    );
    assert_eq!(detail.feasibility.level, Level::Low);
}

#[rstest]
fn unknown_facility_types_are_left_out_of_details(fixture: Fixture) {
    let report = fixture.generate(
        &[rec(1, "observatory", 80.0), rec(2, "park", 60.0)],
        &AreaIndicators::new(),
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    let types: Vec<_> = report
        .detailed_recommendations
        .iter()
        .map(|detail| detail.facility_type.as_str())
        .collect();
    assert_eq!(types, ["park"]);
    let primary = report
        .conclusion
        .primary_recommendation
        .expect("primary recommendation");
    assert_eq!(primary.reason, "reason");
}

#[rstest]
fn score_distribution_buckets_at_eighty_sixty_forty(fixture: Fixture) {
    let recommendations = [
        rec(1, "park", 80.0),
        rec(2, "library", 79.9),
        rec(3, "daycare", 60.0),
        rec(4, "playground", 40.0),
        rec(5, "senior_center", 39.9),
    ];
    let report = fixture.generate(
        &recommendations,
        &AreaIndicators::new(),
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    assert_eq!(
        report.scoring_breakdown.score_distribution,
        ScoreDistribution {
            excellent: 1,
            good: 2,
            fair: 1,
            poor: 1,
        }
    );
    let gaps: Vec<f64> = report
        .scoring_breakdown
        .top_3_comparison
        .iter()
        .map(|row| row.score_difference_from_top)
        .collect();
    assert_eq!(gaps, [0.0, 0.1, 20.0]);
}

#[rstest]
fn comparison_reports_spread_and_leaders(fixture: Fixture) {
    let recommendations = [
        rec(1, "park", 80.0),
        rec(2, "playground", 80.0),
        rec(3, "library", 60.0),
    ];
    let report = fixture.generate(
        &recommendations,
        &AreaIndicators::new(),
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    let comparison = &report.comparative_analysis;

    let gap = comparison.top_vs_bottom.as_ref().expect("two or more");
    assert_eq!(gap.top.description, "park description");
    assert_eq!(gap.bottom.description, "library description");
    assert_eq!(gap.gap, 20.0);
    assert_eq!(gap.interpretation, "several competitive options");

    let leaders: Vec<_> = comparison
        .category_leaders
        .iter()
        .map(|leader| (leader.category.as_str(), leader.leader.as_str()))
        .collect();
    assert_eq!(
        leaders,
        [
            ("education & childcare", "library description"),
            ("leisure & health", "park description"),
        ]
    );

    let spread = &comparison.competitiveness;
    assert_eq!(spread.average_score, 73.3);
    assert_eq!(spread.standard_deviation, 9.4);
    assert_eq!(spread.competitiveness, "highly competitive (scores close)");
    assert_eq!(
        spread.score_range,
        Some(ScoreRange {
            min: 60.0,
            max: 80.0
        })
    );
}

#[rstest]
fn indicator_importance_counts_heavy_weights(fixture: Fixture) {
    let recommendations = [
        rec(1, "playground", 50.0),
        rec(2, "daycare", 40.0),
        rec(3, "parking_lot", 30.0),
    ];
    let report = fixture.generate(
        &recommendations,
        &AreaIndicators::new(),
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    let leading = report
        .scoring_breakdown
        .indicator_importance
        .first()
        .expect("importance rows");
    assert_eq!(leading.indicator, "residential demand");
    assert_eq!(leading.used_in_count, 2);
    assert_eq!(leading.importance, Level::Low);
}

#[rstest]
fn considerations_are_capped_at_four(fixture: Fixture) {
    let area = indicators(&[
        (Indicator::CommercialVitality, 1.0),
        (Indicator::ResidentialDemand, 2.0),
        (Indicator::Transportation, 3.0),
        (Indicator::CulturePublic, 4.0),
    ]);
    let report = fixture.generate(
        &[rec(1, "park", 10.0)],
        &area,
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    let notes = &report.conclusion.key_considerations;
    assert_eq!(notes.len(), 4);
    assert_eq!(
        notes.first().map(String::as_str),
        Some("commercial vitality needs improvement (currently 2.0)")
    );
    let primary = report
        .conclusion
        .primary_recommendation
        .expect("primary recommendation");
    assert_eq!(
        primary.reason,
        "residential demand excellent, culture/public facilities excellent - the best fit for this area."
    );
}

#[rstest]
fn development_potential_drops_two_points_per_facility(fixture: Fixture) {
    let mut existing = ExistingFacilities::new();
    for index in 0..5 {
        existing.push(ExistingFacility::new(format!("Park {index}"), "근린공원"));
    }
    let area = indicators(&[
        (Indicator::CommercialVitality, 40.0),
        (Indicator::Transportation, 20.0),
    ]);
    let report = fixture.generate(&[], &area, &PoiCollection::new(), &existing);

    let potential = &report.area_analysis.development_potential;
    assert_eq!(potential.score, 50.0);
    assert_eq!(potential.level, Level::Medium);

    match &report.area_analysis.existing_facilities_status {
        ExistingFacilitiesStatus::Present {
            total_count,
            diversity,
            saturation_level,
            facility_breakdown,
        } => {
            assert_eq!(*total_count, 5);
            assert_eq!(*diversity, 1);
            assert_eq!(saturation_level, "room available");
            assert_eq!(
                facility_breakdown.first().map(|share| share.percentage),
                Some(100.0)
            );
        }
        ExistingFacilitiesStatus::NoData => panic!("snapshot has facilities"),
    }
}

#[rstest]
fn poi_distribution_is_guarded_for_empty_areas(fixture: Fixture) {
    let report = fixture.generate(
        &[],
        &AreaIndicators::new(),
        &PoiCollection::new(),
        &ExistingFacilities::new(),
    );
    let distribution = &report.area_analysis.poi_distribution;
    assert_eq!(distribution.total_count, 0);
    assert_eq!(distribution.density, Level::Low);
    assert!(distribution
        .top_categories
        .iter()
        .all(|share| share.percentage == 0.0));
}

#[rstest]
fn existing_status_serialises_with_a_status_tag() {
    let json = serde_json::to_value(ExistingFacilitiesStatus::NoData).expect("serialise");
    assert_eq!(json, serde_json::json!({ "status": "no_data" }));
}
