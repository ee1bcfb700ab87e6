//! Rank candidate public facilities against area indicators.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use spacefit_core::{
    AnalysisConfig, AreaIndicators, ExistingFacilities, FacilityCategory, FacilityRule,
    PoiCollection, count_to_f64, normalise_score, round1,
};

/// POI count at which the saturation penalty reaches its cap.
pub const POI_SATURATION_COUNT: f64 = 10.0;

/// Existing-facility count at which the snapshot penalty reaches its cap.
pub const EXISTING_SATURATION_COUNT: f64 = 3.0;

/// Largest fraction removed by the existing-facility penalty.
pub const EXISTING_PENALTY_CAP: f64 = 0.3;

/// Nearby POI count above which a saturation note is added to the reason.
const SATURATION_NOTE_THRESHOLD: usize = 5;

/// Reason used when no strength or penalty note applies.
pub const DEFAULT_REASON: &str = "comprehensive evaluation complete";

/// A ranked facility recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Dense, 1-based position in the ranking.
    pub rank: usize,
    /// Facility rule key.
    pub facility_type: String,
    /// Human-readable facility name.
    pub description: String,
    /// Suitability on `0..=100`.
    #[serde(serialize_with = "serialize_round1")]
    pub score: f64,
    /// Comma-separated explanation of the score.
    pub reason: String,
}

fn serialize_round1<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round1(*value))
}

/// Fraction removed from a facility score when `count` competing POIs exist.
///
/// Grows linearly with `count` and saturates at `penalty_weight` once
/// [`POI_SATURATION_COUNT`] POIs are present.
///
/// # Examples
/// ```
/// use spacefit_scorer::poi_penalty;
///
/// assert_eq!(poi_penalty(0, 0.5), 0.0);
/// assert_eq!(poi_penalty(4, 0.5), 0.2);
/// assert_eq!(poi_penalty(25, 0.5), 0.5);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "penalty is a scaled ratio")]
pub fn poi_penalty(count: usize, penalty_weight: f64) -> f64 {
    ((count_to_f64(count) / POI_SATURATION_COUNT).min(1.0) * penalty_weight).min(penalty_weight)
}

/// Fraction removed from a facility score when `count` facilities of the
/// competing category are already on record.
///
/// # Examples
/// ```
/// use spacefit_scorer::existing_facility_penalty;
///
/// assert_eq!(existing_facility_penalty(0), 0.0);
/// assert!((existing_facility_penalty(1) - 0.1).abs() < 1e-12);
/// assert_eq!(existing_facility_penalty(7), 0.3);
/// ```
#[must_use]
#[expect(clippy::float_arithmetic, reason = "penalty is a scaled ratio")]
pub fn existing_facility_penalty(count: usize) -> f64 {
    ((count_to_f64(count) / EXISTING_SATURATION_COUNT).min(1.0) * EXISTING_PENALTY_CAP)
        .min(EXISTING_PENALTY_CAP)
}

/// Weighted sum of raw indicator scores for `rule`, before penalties.
///
/// Indicators missing from `indicators` contribute nothing.
#[must_use]
#[expect(clippy::float_arithmetic, reason = "base score is a weighted sum")]
pub fn base_score(rule: &FacilityRule, indicators: &AreaIndicators) -> f64 {
    rule.resolved_weights()
        .map(|(indicator, weight)| {
            if indicators.get(indicator).is_none() {
                log::debug!("indicator {indicator} was not computed; contributing 0");
            }
            indicators.score(indicator) * weight
        })
        .sum()
}

/// Score and rank every configured facility type.
#[derive(Debug, Clone)]
pub struct PublicFacilityRecommender {
    config: Arc<AnalysisConfig>,
}

impl PublicFacilityRecommender {
    /// Build a recommender over shared configuration.
    #[must_use]
    pub const fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Return the top-N facility types for an area, best first.
    ///
    /// Scores are sorted descending; equal scores keep configuration order.
    /// The existing-facility penalty only applies when `existing` holds at
    /// least one record.
    #[must_use]
    pub fn recommend(
        &self,
        indicators: &AreaIndicators,
        pois: &PoiCollection,
        existing: &ExistingFacilities,
    ) -> Vec<Recommendation> {
        let mut scored: Vec<Recommendation> = self
            .config
            .facility_rules
            .iter()
            .map(|(facility_type, rule)| Recommendation {
                rank: 0,
                facility_type: facility_type.clone(),
                description: rule.description.clone(),
                score: self.facility_score(facility_type, rule, indicators, pois, existing),
                reason: self.reason(facility_type, rule, indicators, pois, existing),
            })
            .collect();

        // `sort_by` is stable, so ties keep declaration order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.config.scoring.top_n_recommendations);
        for (index, recommendation) in scored.iter_mut().enumerate() {
            recommendation.rank = index.saturating_add(1);
        }
        scored
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "penalties scale the score multiplicatively"
    )]
    fn facility_score(
        &self,
        facility_type: &str,
        rule: &FacilityRule,
        indicators: &AreaIndicators,
        pois: &PoiCollection,
        existing: &ExistingFacilities,
    ) -> f64 {
        let mut raw = base_score(rule, indicators);

        if let Some(code) = rule.penalty_code() {
            raw *= 1.0 - poi_penalty(pois.count(code.group()), rule.penalty_weight);
        } else if let Some(unknown) = &rule.penalty_category {
            log::debug!("{facility_type}: ignoring unknown penalty category '{unknown}'");
        }

        if !existing.is_empty() {
            if let Some(category) = FacilityCategory::for_facility_type(facility_type) {
                raw *= 1.0 - existing_facility_penalty(existing.count(category));
            }
        }

        normalise_score(raw, self.config.scoring.max_possible_score)
    }

    fn reason(
        &self,
        facility_type: &str,
        rule: &FacilityRule,
        indicators: &AreaIndicators,
        pois: &PoiCollection,
        existing: &ExistingFacilities,
    ) -> String {
        let max = self.config.scoring.max_possible_score;
        let mut reasons: Vec<String> = rule
            .top_indicators(2)
            .into_iter()
            .filter_map(|(indicator, _)| {
                let normalised = normalise_score(indicators.score(indicator), max);
                let verdict = if normalised >= 70.0 {
                    "excellent"
                } else if normalised >= 50.0 {
                    "good"
                } else {
                    return None;
                };
                Some(format!("{} {verdict} ({normalised:.1})", indicator.label()))
            })
            .collect();

        if let Some(code) = rule.penalty_code() {
            let count = pois.count(code.group());
            if count > SATURATION_NOTE_THRESHOLD {
                reasons.push(format!("{count} existing {} nearby", code.label()));
            }
        }

        if !existing.is_empty() {
            if let Some(category) = FacilityCategory::for_facility_type(facility_type) {
                let count = existing.count(category);
                if count > 0 {
                    reasons.push(format!("{count} donated {} on record", category.noun()));
                }
            }
        }

        if reasons.is_empty() {
            DEFAULT_REASON.to_owned()
        } else {
            reasons.join(", ")
        }
    }
}

#[cfg(test)]
#[expect(
    clippy::float_arithmetic,
    reason = "assertions compare floating-point scores"
)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};
    use spacefit_core::{CategoryCode, ExistingFacility, Indicator, PointOfInterest};

    fn config_with_rules(rules: &str) -> AnalysisConfig {
        let yaml = format!(
            "indicators:\n  transportation:\n    categories: [SW8]\nfacility_rules:\n{rules}"
        );
        AnalysisConfig::from_yaml_str(&yaml).expect("test configuration")
    }

    fn poi(category: CategoryCode) -> PointOfInterest {
        PointOfInterest::new("poi", category, Coord { x: 127.0, y: 37.5 }, 100.0)
    }

    fn indicators(transportation: f64) -> AreaIndicators {
        [(Indicator::Transportation, transportation)]
            .into_iter()
            .collect()
    }

    #[fixture]
    fn recommender() -> PublicFacilityRecommender {
        PublicFacilityRecommender::new(Arc::new(AnalysisConfig::default()))
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(5, 0.25)]
    #[case(10, 0.5)]
    #[case(40, 0.5)]
    fn poi_penalty_caps_at_weight(#[case] count: usize, #[case] expected: f64) {
        assert!((poi_penalty(count, 0.5) - expected).abs() < 1e-12);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(3, 0.3)]
    #[case(30, 0.3)]
    fn existing_penalty_caps_at_thirty_percent(#[case] count: usize, #[case] expected: f64) {
        assert!((existing_facility_penalty(count) - expected).abs() < 1e-12);
    }

    #[rstest]
    fn empty_area_scores_zero_everywhere(recommender: PublicFacilityRecommender) {
        let indicators: AreaIndicators = Indicator::ALL.into_iter().map(|i| (i, 0.0)).collect();
        let recommendations = recommender.recommend(
            &indicators,
            &PoiCollection::with_all_groups(),
            &ExistingFacilities::new(),
        );

        assert_eq!(recommendations.len(), 5);
        for (index, recommendation) in recommendations.iter().enumerate() {
            assert_eq!(recommendation.rank, index + 1);
            assert_eq!(recommendation.score, 0.0);
            assert_eq!(recommendation.reason, DEFAULT_REASON);
        }
        // All tied at zero, so configuration order survives.
        assert_eq!(recommendations[0].facility_type, "playground");
        assert_eq!(recommendations[1].facility_type, "park");
    }

    #[rstest]
    fn ties_keep_declaration_order() {
        let config = config_with_rules(
            "  bus_depot:\n    description: Bus depot\n    indicator_weights: { transportation: 1.0 }\n  \
             park_and_ride:\n    description: Park and ride\n    indicator_weights: { transportation: 1.0 }\n",
        );
        let recommender = PublicFacilityRecommender::new(Arc::new(config));
        let ranked =
            recommender.recommend(&indicators(35.0), &PoiCollection::new(), &ExistingFacilities::new());

        assert_eq!(ranked.len(), 2);
        assert!((ranked[0].score - 70.0).abs() < 1e-9);
        assert!((ranked[1].score - 70.0).abs() < 1e-9);
        assert_eq!(ranked[0].facility_type, "bus_depot");
        assert_eq!(ranked[1].rank, 2);
    }

    #[rstest]
    fn penalties_compose_multiplicatively() {
        let config = config_with_rules(
            "  parking_lot:\n    description: Parking\n    indicator_weights: { transportation: 1.0 }\n    \
             penalty_category: PK6\n    penalty_weight: 0.5\n",
        );
        let recommender = PublicFacilityRecommender::new(Arc::new(config));
        let pois: PoiCollection = (0..10).map(|_| poi(CategoryCode::Parking)).collect();
        let existing: ExistingFacilities = (0..3)
            .map(|n| ExistingFacility::new(format!("lot {n}"), "공용주차장"))
            .collect();

        let ranked = recommender.recommend(&indicators(40.0), &pois, &existing);

        // 40 * (1 - 0.5) * (1 - 0.3) = 14 raw, 28 normalised.
        assert!((ranked[0].score - 28.0).abs() < 1e-9);
        assert_eq!(
            ranked[0].reason,
            "transportation access excellent (80.0), 10 existing parking lots nearby, \
             3 donated public parking lots on record"
        );
    }

    #[rstest]
    fn reason_lists_strong_top_indicators() {
        let config = config_with_rules(
            "  station_plaza:\n    description: Station plaza\n    indicator_weights: { transportation: 0.5 }\n",
        );
        let recommender = PublicFacilityRecommender::new(Arc::new(config));

        let excellent =
            recommender.recommend(&indicators(40.0), &PoiCollection::new(), &ExistingFacilities::new());
        assert_eq!(excellent[0].reason, "transportation access excellent (80.0)");

        let good =
            recommender.recommend(&indicators(27.5), &PoiCollection::new(), &ExistingFacilities::new());
        assert_eq!(good[0].reason, "transportation access good (55.0)");
    }

    #[rstest]
    fn undefined_indicators_score_zero() {
        let config = config_with_rules(
            "  pocket_park:\n    description: Pocket park\n    \
             indicator_weights: { green_space: 5.0, transportation: 0.5 }\n",
        );
        let recommender = PublicFacilityRecommender::new(Arc::new(config));

        let ranked =
            recommender.recommend(&indicators(40.0), &PoiCollection::new(), &ExistingFacilities::new());

        // Only transportation counts: 40 * 0.5 = 20 raw, 40 normalised.
        assert!((ranked[0].score - 40.0).abs() < 1e-9);
        assert_eq!(ranked[0].reason, "transportation access excellent (80.0)");
    }

    #[rstest]
    fn missing_indicators_contribute_nothing(recommender: PublicFacilityRecommender) {
        let ranked = recommender.recommend(
            &AreaIndicators::new(),
            &PoiCollection::new(),
            &ExistingFacilities::new(),
        );
        assert!(ranked.iter().all(|r| r.score == 0.0));
    }

    #[rstest]
    fn scores_serialise_rounded() {
        let recommendation = Recommendation {
            rank: 1,
            facility_type: "park".to_owned(),
            description: "Park".to_owned(),
            score: 63.456,
            reason: DEFAULT_REASON.to_owned(),
        };
        let json = serde_json::to_value(&recommendation).expect("serialise");
        assert_eq!(json["score"], 63.5);
        assert_eq!(json["rank"], 1);
    }
}
