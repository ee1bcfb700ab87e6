//! Composite result returned by [`crate::AreaAnalyzer`].

use serde::Serialize;
use spacefit_core::{AreaIndicators, CategoryCode, Grade, PointOfInterest, UsageTier};
use spacefit_scorer::Recommendation;
use spacefit_scorer::report::{Coordinates, FacilityReport};

use crate::ExistingFacilityStats;

/// Everything known about one analysed address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaAnalysis {
    /// Address as resolved by the provider.
    pub address: String,
    /// Resolved position.
    pub coordinates: Coordinates,
    /// Baseline livability score.
    pub analysis: LivabilitySummary,
    /// Normalised indicator scores, one decimal place.
    pub area_indicators: AreaIndicators,
    /// Ranked public-facility recommendations.
    pub recommended_public_facilities: Vec<Recommendation>,
    /// Existing facilities around the location.
    pub existing_facilities: ExistingFacilityStats,
    /// Narrative report on the recommendations.
    pub facility_report: FacilityReport,
    /// Baseline category counts, nearest POIs and sub-scores.
    pub details: AnalysisDetails,
    /// Every retrieved POI, for map display.
    pub poi_list: Vec<PoiMarker>,
}

/// Baseline livability score and its aggregates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LivabilitySummary {
    /// Normalised total, one decimal place.
    pub total_score: f64,
    /// Letter grade of the total.
    pub grade: Grade,
    /// Living aggregate, one decimal place.
    pub living: f64,
    /// Transportation aggregate, one decimal place.
    pub transportation: f64,
    /// Leisure aggregate, one decimal place.
    pub leisure: f64,
    /// Residential usage tier implied by the grade.
    pub recommend: UsageTier,
}

/// POI counts for the baseline categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaselineCounts {
    /// Hospitals.
    pub medical: usize,
    /// Schools.
    pub schools: usize,
    /// Convenience stores.
    pub convenience_stores: usize,
    /// Subway stations.
    pub subway_stations: usize,
    /// Cafes.
    pub cafes: usize,
}

/// Closest POI of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NearestPoi {
    /// Place name.
    pub name: String,
    /// Distance in whole metres.
    pub distance: u64,
}

/// Closest POI of each baseline category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NearestPois {
    /// Closest hospital.
    pub medical: Option<NearestPoi>,
    /// Closest school.
    pub school: Option<NearestPoi>,
    /// Closest convenience store.
    pub convenience_store: Option<NearestPoi>,
    /// Closest subway station.
    pub subway: Option<NearestPoi>,
    /// Closest cafe.
    pub cafe: Option<NearestPoi>,
}

/// Baseline aggregates, one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightedScores {
    /// Living aggregate.
    pub living: f64,
    /// Transportation aggregate.
    pub transportation: f64,
    /// Leisure aggregate.
    pub leisure: f64,
}

/// Supporting detail for the baseline score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisDetails {
    /// POI counts per baseline category.
    pub counts: BaselineCounts,
    /// Closest POI per baseline category.
    pub nearest: NearestPois,
    /// Baseline aggregates.
    pub weighted_scores: WeightedScores,
}

/// A POI flattened for map display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiMarker {
    /// Place name.
    pub name: String,
    /// Provider category code.
    pub category_group_code: CategoryCode,
    /// Longitude.
    pub x: f64,
    /// Latitude.
    pub y: f64,
    /// Distance in whole metres.
    pub distance: u64,
    /// Street address.
    pub address: String,
}

impl From<&PointOfInterest> for PoiMarker {
    fn from(poi: &PointOfInterest) -> Self {
        Self {
            name: poi.name.clone(),
            category_group_code: poi.category,
            x: poi.location.x,
            y: poi.location.y,
            distance: crate::whole_metres(poi.distance_m),
            address: poi.address.clone(),
        }
    }
}
