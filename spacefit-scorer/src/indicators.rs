//! Aggregate nearby POIs into area indicators.

use std::sync::Arc;

use spacefit_core::{AnalysisConfig, AreaIndicators, PoiCollection, distance_weight};

/// Compute raw area indicators from retrieved POIs.
///
/// Each configured indicator sums `distance_weight(d) * category_weight`
/// over every POI of its categories. Results are raw; normalise them with
/// [`spacefit_core::normalise_score`] for presentation.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use geo::Coord;
/// use spacefit_core::{AnalysisConfig, CategoryCode, Indicator, PoiCollection, PointOfInterest};
/// use spacefit_scorer::IndicatorCalculator;
///
/// let calculator = IndicatorCalculator::new(Arc::new(AnalysisConfig::default()));
/// let pois: PoiCollection = [PointOfInterest::new(
///     "City Hall Station",
///     CategoryCode::SubwayStation,
///     Coord { x: 126.97, y: 37.56 },
///     500.0,
/// )]
/// .into_iter()
/// .collect();
///
/// let indicators = calculator.calculate(&pois);
/// assert_eq!(indicators.score(Indicator::Transportation), 1.5);
/// ```
#[derive(Debug, Clone)]
pub struct IndicatorCalculator {
    config: Arc<AnalysisConfig>,
}

impl IndicatorCalculator {
    /// Build a calculator over shared configuration.
    #[must_use]
    pub const fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Compute every configured indicator in declaration order.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "indicator scores are weighted sums"
    )]
    pub fn calculate(&self, pois: &PoiCollection) -> AreaIndicators {
        self.config
            .resolved_indicators()
            .map(|(indicator, definition)| {
                let score = definition
                    .resolved()
                    .map(|(code, weight)| {
                        pois.get(code.group())
                            .iter()
                            .map(|poi| distance_weight(poi.distance_m) * weight)
                            .sum::<f64>()
                    })
                    .sum::<f64>();
                (indicator, score)
            })
            .collect()
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
    use spacefit_core::{CategoryCode, Indicator, PointOfInterest};

    fn poi(category: CategoryCode, distance_m: f64) -> PointOfInterest {
        PointOfInterest::new("poi", category, Coord { x: 127.0, y: 37.5 }, distance_m)
    }

    #[fixture]
    fn calculator() -> IndicatorCalculator {
        IndicatorCalculator::new(Arc::new(AnalysisConfig::default()))
    }

    #[rstest]
    fn empty_collection_yields_zero_for_every_indicator(calculator: IndicatorCalculator) {
        let indicators = calculator.calculate(&PoiCollection::with_all_groups());
        assert_eq!(indicators.len(), Indicator::ALL.len());
        assert!(indicators.iter().all(|(_, score)| score == 0.0));
    }

    #[rstest]
    fn sums_weighted_decay_across_categories(calculator: IndicatorCalculator) {
        let pois: PoiCollection = [
            poi(CategoryCode::Daycare, 0.0),
            poi(CategoryCode::School, 500.0),
            poi(CategoryCode::Hospital, 2000.0),
        ]
        .into_iter()
        .collect();

        let indicators = calculator.calculate(&pois);

        // 1.0 * 1.5 + 0.5 * 1.5 + 0.0 * 1.0
        let residential = indicators.score(Indicator::ResidentialDemand);
        assert!((residential - 2.25).abs() < 1e-9);
        assert_eq!(indicators.score(Indicator::Transportation), 0.0);
    }

    #[rstest]
    fn keeps_configuration_order(calculator: IndicatorCalculator) {
        let order: Vec<_> = calculator
            .calculate(&PoiCollection::new())
            .iter()
            .map(|(indicator, _)| indicator)
            .collect();
        assert_eq!(order, Indicator::ALL);
    }
}
