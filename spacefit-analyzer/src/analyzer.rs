//! Orchestrate one livability analysis from address to report.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use spacefit_core::{
    AnalysisConfig, ExistingFacilities, FacilityLoader, Location, LocationProvider,
    PoiCollection, PoiGroup, normalise_score, round1,
};
use spacefit_scorer::report::{Coordinates, ReportInput};
use spacefit_scorer::{
    BaselineScorer, BaselineScores, FacilityReportGenerator, IndicatorCalculator,
    PublicFacilityRecommender,
};

use crate::result::{
    AnalysisDetails, AreaAnalysis, BaselineCounts, LivabilitySummary, NearestPoi, NearestPois,
    PoiMarker, WeightedScores,
};
use crate::{AnalysisError, existing_facility_stats, whole_metres};

/// Analyse addresses with a location provider and a fixed facility snapshot.
///
/// The configuration and snapshot are shared read-only, so one analyzer can
/// serve concurrent calls when its provider is `Sync`.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use spacefit_analyzer::{AnalysisError, AreaAnalyzer};
/// use spacefit_core::test_support::StaticLocationProvider;
/// use spacefit_core::{AnalysisConfig, ExistingFacilities, Location, PoiCollection};
///
/// let provider = StaticLocationProvider::new(
///     Location::new("Jongno-gu", 37.5735, 126.9790),
///     PoiCollection::with_all_groups(),
/// );
/// let analyzer = AreaAnalyzer::new(
///     provider,
///     Arc::new(AnalysisConfig::default()),
///     Arc::new(ExistingFacilities::new()),
/// );
///
/// let analysis = analyzer.analyze("Jongno-gu")?;
/// assert_eq!(analysis.analysis.total_score, 0.0);
/// assert!(matches!(
///     analyzer.analyze("Atlantis"),
///     Err(AnalysisError::AddressNotFound { .. })
/// ));
/// # Ok::<(), AnalysisError>(())
/// ```
#[derive(Debug)]
pub struct AreaAnalyzer<P> {
    provider: P,
    config: Arc<AnalysisConfig>,
    existing: Arc<ExistingFacilities>,
    baseline: BaselineScorer,
    indicators: IndicatorCalculator,
    recommender: PublicFacilityRecommender,
    reports: FacilityReportGenerator,
}

impl<P: LocationProvider> AreaAnalyzer<P> {
    /// Build an analyzer over a provider, configuration and snapshot.
    #[must_use]
    pub fn new(provider: P, config: Arc<AnalysisConfig>, existing: Arc<ExistingFacilities>) -> Self {
        Self {
            provider,
            baseline: BaselineScorer::from_config(&config),
            indicators: IndicatorCalculator::new(Arc::clone(&config)),
            recommender: PublicFacilityRecommender::new(Arc::clone(&config)),
            reports: FacilityReportGenerator::new(Arc::clone(&config)),
            config,
            existing,
        }
    }

    /// Build an analyzer whose snapshot is loaded once from `loader`.
    #[must_use]
    pub fn with_loader(
        provider: P,
        config: Arc<AnalysisConfig>,
        loader: &impl FacilityLoader,
    ) -> Self {
        let existing = loader.load();
        log::debug!(
            "loaded {} existing facilities in {} categories",
            existing.total(),
            existing.category_count()
        );
        Self::new(provider, config, Arc::new(existing))
    }

    /// Existing-facility snapshot used by every analysis.
    #[must_use]
    pub fn existing_facilities(&self) -> &ExistingFacilities {
        &self.existing
    }

    /// Analyse `address`, stamping the report with the current local time.
    ///
    /// # Errors
    /// See [`AreaAnalyzer::analyze_at`].
    pub fn analyze(&self, address: &str) -> Result<AreaAnalysis, AnalysisError> {
        self.analyze_at(address, Local::now().naive_local())
    }

    /// Analyse `address`, stamping the report with `analysed_at`.
    ///
    /// Stages run strictly in order: geocode, POI retrieval, scoring,
    /// recommendation and report assembly. A failing stage stops the run.
    ///
    /// # Errors
    /// - [`AnalysisError::InvalidInput`] for a blank address or a request the
    ///   provider rejects.
    /// - [`AnalysisError::AddressNotFound`] when geocoding finds nothing.
    /// - [`AnalysisError::ProviderUnavailable`] for any other provider failure.
    pub fn analyze_at(
        &self,
        address: &str,
        analysed_at: NaiveDateTime,
    ) -> Result<AreaAnalysis, AnalysisError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(AnalysisError::InvalidInput {
                message: "address must not be blank".to_owned(),
            });
        }

        let location = self
            .provider
            .geocode(query)?
            .ok_or_else(|| AnalysisError::AddressNotFound {
                address: query.to_owned(),
            })?;
        log::debug!(
            "geocoded {query:?} to ({}, {})",
            location.lat(),
            location.lng()
        );

        let pois = self.provider.search_all_categories(&location)?;
        log::debug!("retrieved {} POIs around {query:?}", pois.total());

        let baseline = self.baseline.score(&pois);
        let indicators = self.indicators.calculate(&pois);

        let recommendations = self.recommender.recommend(&indicators, &pois, &self.existing);
        let existing_facilities = existing_facility_stats(
            &self.existing,
            location.coordinate,
            self.config.scoring.nearby_radius_m,
        );

        let facility_report = self.reports.generate(&ReportInput {
            recommendations: &recommendations,
            indicators: &indicators,
            pois: &pois,
            existing: &self.existing,
            location: &location,
            analysed_at,
        });

        let max = self.config.scoring.max_possible_score;
        Ok(AreaAnalysis {
            address: location.address.clone(),
            coordinates: coordinates(&location),
            analysis: summary(&baseline),
            area_indicators: indicators.map_scores(|raw| round1(normalise_score(raw, max))),
            recommended_public_facilities: recommendations,
            existing_facilities,
            facility_report,
            details: details(&pois, &baseline),
            poi_list: pois
                .iter()
                .flat_map(|(_, group)| group.iter().map(PoiMarker::from))
                .collect(),
        })
    }
}

const fn coordinates(location: &Location) -> Coordinates {
    Coordinates {
        lat: location.lat(),
        lng: location.lng(),
    }
}

fn summary(baseline: &BaselineScores) -> LivabilitySummary {
    LivabilitySummary {
        total_score: round1(baseline.total_score),
        grade: baseline.grade,
        living: round1(baseline.living),
        transportation: round1(baseline.transportation),
        leisure: round1(baseline.leisure),
        recommend: baseline.grade.usage(),
    }
}

fn details(pois: &PoiCollection, baseline: &BaselineScores) -> AnalysisDetails {
    let nearest = |group: PoiGroup| {
        pois.nearest(group).map(|poi| NearestPoi {
            name: poi.name.clone(),
            distance: whole_metres(poi.distance_m),
        })
    };

    AnalysisDetails {
        counts: BaselineCounts {
            medical: pois.count(PoiGroup::Medical),
            schools: pois.count(PoiGroup::Schools),
            convenience_stores: pois.count(PoiGroup::ConvenienceStores),
            subway_stations: pois.count(PoiGroup::SubwayStations),
            cafes: pois.count(PoiGroup::Cafes),
        },
        nearest: NearestPois {
            medical: nearest(PoiGroup::Medical),
            school: nearest(PoiGroup::Schools),
            convenience_store: nearest(PoiGroup::ConvenienceStores),
            subway: nearest(PoiGroup::SubwayStations),
            cafe: nearest(PoiGroup::Cafes),
        },
        weighted_scores: WeightedScores {
            living: round1(baseline.living),
            transportation: round1(baseline.transportation),
            leisure: round1(baseline.leisure),
        },
    }
}
