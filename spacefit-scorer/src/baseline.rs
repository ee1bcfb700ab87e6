//! Five-category baseline livability score.
//!
//! The baseline predates the configurable indicators and is kept as an
//! independent view: medical, school and convenience-store POIs feed the
//! living aggregate, subway stations feed transportation and cafes feed
//! leisure. Its normalisation scale is separate from the indicator scale.

use serde::Serialize;
use spacefit_core::{
    AnalysisConfig, BaselineWeights, Grade, PoiCollection, PoiGroup, distance_weight,
    normalise_score,
};

/// Raw baseline aggregates and the normalised total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BaselineScores {
    /// Weighted hospital contribution.
    pub medical: f64,
    /// Weighted school contribution.
    pub school: f64,
    /// Weighted convenience-store contribution.
    pub convenience_store: f64,
    /// Weighted subway-station contribution.
    pub subway: f64,
    /// Weighted cafe contribution.
    pub cafe: f64,
    /// `medical + school + convenience_store`.
    pub living: f64,
    /// Equal to `subway`.
    pub transportation: f64,
    /// Equal to `cafe`.
    pub leisure: f64,
    /// Sum of the three aggregates.
    pub total: f64,
    /// `total` normalised onto `0..=100`.
    pub total_score: f64,
    /// Letter grade of `total_score`.
    pub grade: Grade,
}

/// Score POIs with the fixed baseline weights.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineScorer {
    weights: BaselineWeights,
    max_possible_score: f64,
}

impl BaselineScorer {
    /// Build a scorer from explicit weights and normalisation scale.
    #[must_use]
    pub const fn new(weights: BaselineWeights, max_possible_score: f64) -> Self {
        Self {
            weights,
            max_possible_score,
        }
    }

    /// Build a scorer from the baseline section of `config`.
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.baseline_weights.clone(),
            config.scoring.baseline_max_possible_score,
        )
    }

    /// Score `pois`.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use spacefit_core::{AnalysisConfig, CategoryCode, Grade, PoiCollection, PointOfInterest};
    /// use spacefit_scorer::BaselineScorer;
    ///
    /// let scorer = BaselineScorer::from_config(&AnalysisConfig::default());
    /// let pois: PoiCollection = [PointOfInterest::new(
    ///     "Clinic",
    ///     CategoryCode::Hospital,
    ///     Coord { x: 127.0, y: 37.5 },
    ///     0.0,
    /// )]
    /// .into_iter()
    /// .collect();
    ///
    /// let scores = scorer.score(&pois);
    /// assert_eq!(scores.living, 2.0);
    /// assert_eq!(scores.grade, Grade::F);
    /// ```
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "baseline aggregates are sums")]
    pub fn score(&self, pois: &PoiCollection) -> BaselineScores {
        let weighted = |group: PoiGroup, weight: f64| -> f64 {
            pois.get(group)
                .iter()
                .map(|poi| weight * distance_weight(poi.distance_m))
                .sum()
        };

        let medical = weighted(PoiGroup::Medical, self.weights.medical);
        let school = weighted(PoiGroup::Schools, self.weights.school);
        let convenience_store =
            weighted(PoiGroup::ConvenienceStores, self.weights.convenience_store);
        let subway = weighted(PoiGroup::SubwayStations, self.weights.subway);
        let cafe = weighted(PoiGroup::Cafes, self.weights.cafe);

        let living = medical + school + convenience_store;
        let total = living + subway + cafe;
        let total_score = normalise_score(total, self.max_possible_score);

        BaselineScores {
            medical,
            school,
            convenience_store,
            subway,
            cafe,
            living,
            transportation: subway,
            leisure: cafe,
            total,
            total_score,
            grade: Grade::from_score(total_score),
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
    use spacefit_core::{CategoryCode, PointOfInterest, UsageTier};

    fn poi(category: CategoryCode, distance_m: f64) -> PointOfInterest {
        PointOfInterest::new("poi", category, Coord { x: 127.0, y: 37.5 }, distance_m)
    }

    #[fixture]
    fn scorer() -> BaselineScorer {
        BaselineScorer::from_config(&AnalysisConfig::default())
    }

    #[rstest]
    fn empty_area_scores_zero(scorer: BaselineScorer) {
        let scores = scorer.score(&PoiCollection::with_all_groups());
        assert_eq!(scores.total, 0.0);
        assert_eq!(scores.total_score, 0.0);
        assert_eq!(scores.grade, Grade::F);
        assert_eq!(scores.grade.usage(), UsageTier::InsufficientInfrastructure);
    }

    #[rstest]
    fn groups_categories_into_aggregates(scorer: BaselineScorer) {
        let pois: PoiCollection = [
            poi(CategoryCode::Hospital, 0.0),
            poi(CategoryCode::ConvenienceStore, 500.0),
            poi(CategoryCode::SubwayStation, 250.0),
            poi(CategoryCode::Cafe, 0.0),
            poi(CategoryCode::Restaurant, 0.0),
        ]
        .into_iter()
        .collect();

        let scores = scorer.score(&pois);

        assert!((scores.living - 2.15).abs() < 1e-9);
        assert!((scores.transportation - 2.25).abs() < 1e-9);
        assert!((scores.leisure - 0.5).abs() < 1e-9);
        assert!((scores.total - 4.9).abs() < 1e-9);
        assert!((scores.total_score - 4.9 / 30.0 * 100.0).abs() < 1e-9);
    }

    #[rstest]
    fn saturated_area_caps_at_one_hundred(scorer: BaselineScorer) {
        let pois: PoiCollection = (0..12)
            .map(|_| poi(CategoryCode::SubwayStation, 0.0))
            .collect();
        let scores = scorer.score(&pois);
        assert_eq!(scores.total_score, 100.0);
        assert_eq!(scores.grade, Grade::APlus);
    }
}
