#![expect(
    clippy::float_arithmetic,
    reason = "area characterisation derives shares and means"
)]

use serde::Serialize;
use spacefit_core::{
    AnalysisConfig, AreaIndicators, ExistingFacilities, Indicator, PoiCollection, PoiGroup,
    count_to_f64, round1,
};

use super::{Level, ReportGrade, ReportInput, normalised};

/// Dominant character of the analysed area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Residential demand dominates.
    Residential,
    /// Commercial vitality dominates.
    Commercial,
    /// Transport access stands out.
    TransportHub,
    /// No single dominant character.
    Mixed,
}

/// Interpretation of one indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorAssessment {
    /// Indicator label.
    pub indicator: String,
    /// Normalised score, one decimal place.
    pub score: f64,
    /// Report grade of the normalised score.
    pub grade: ReportGrade,
    /// Short narrative reading of the score.
    pub interpretation: String,
}

/// POI count for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiShare {
    /// POI group key.
    pub category: String,
    /// Number of POIs in the group.
    pub count: usize,
    /// Share of all POIs, in percent.
    pub percentage: f64,
}

/// How POIs are spread across groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiDistribution {
    /// Total POIs across all groups.
    pub total_count: usize,
    /// Density band of the total.
    pub density: Level,
    /// The five most populated groups.
    pub top_categories: Vec<PoiShare>,
}

/// Existing facilities of one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityShare {
    /// Canonical category label.
    #[serde(rename = "type")]
    pub facility_type: String,
    /// Facilities on record.
    pub count: usize,
    /// Share of the snapshot, in percent.
    pub percentage: f64,
}

/// Summary of the existing-facility snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExistingFacilitiesStatus {
    /// The snapshot is empty.
    NoData,
    /// The snapshot holds at least one facility.
    Present {
        /// Facilities on record.
        total_count: usize,
        /// Number of distinct categories.
        diversity: usize,
        /// Saturation band of the total.
        saturation_level: String,
        /// Per-category counts, largest first.
        facility_breakdown: Vec<FacilityShare>,
    },
}

/// Residential density estimated from demand-side POIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopulationDensity {
    /// Density band.
    pub level: Level,
    /// Schools, daycares, restaurants and cafes combined.
    pub estimated_score: usize,
    /// What the estimate is derived from.
    pub basis: String,
}

/// Room left for new public facilities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentPotential {
    /// Potential on a `0..=100` scale.
    pub score: f64,
    /// Potential band.
    pub level: Level,
    /// Narrative reading of the band.
    pub reasoning: String,
}

/// Characterisation of the analysed area.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaCharacterisation {
    /// Dominant character.
    pub location_type: LocationType,
    /// One assessment per computed indicator.
    pub indicator_analysis: Vec<IndicatorAssessment>,
    /// POI spread.
    pub poi_distribution: PoiDistribution,
    /// Existing-facility snapshot summary.
    pub existing_facilities_status: ExistingFacilitiesStatus,
    /// Estimated residential density.
    pub population_density: PopulationDensity,
    /// Room for new facilities.
    pub development_potential: DevelopmentPotential,
}

pub(super) fn build(config: &AnalysisConfig, input: &ReportInput<'_>) -> AreaCharacterisation {
    AreaCharacterisation {
        location_type: location_type(input.indicators),
        indicator_analysis: input
            .indicators
            .iter()
            .map(|(indicator, raw)| assess(indicator, normalised(config, raw)))
            .collect(),
        poi_distribution: poi_distribution(input.pois),
        existing_facilities_status: existing_status(input.existing),
        population_density: population_density(input.pois),
        development_potential: development_potential(config, input.indicators, input.existing),
    }
}

/// Classify on raw scores.
fn location_type(indicators: &AreaIndicators) -> LocationType {
    let residential = indicators.score(Indicator::ResidentialDemand);
    let commercial = indicators.score(Indicator::CommercialVitality);
    let transportation = indicators.score(Indicator::Transportation);

    if residential > commercial && residential > 30.0 {
        LocationType::Residential
    } else if commercial > residential && commercial > 30.0 {
        LocationType::Commercial
    } else if transportation > 40.0 {
        LocationType::TransportHub
    } else {
        LocationType::Mixed
    }
}

fn assess(indicator: Indicator, score: f64) -> IndicatorAssessment {
    let band = match score {
        s if s >= 80.0 => "very strong",
        s if s >= 60.0 => "good",
        s if s >= 40.0 => "moderate",
        s if s >= 20.0 => "needs improvement",
        _ => "severely lacking",
    };
    let strong = score >= 60.0;
    let reading = match indicator {
        Indicator::CommercialVitality if strong => "commercial activity is lively",
        Indicator::CommercialVitality => "commercial activity is sluggish",
        Indicator::ResidentialDemand if strong => "residential infrastructure is sufficient",
        Indicator::ResidentialDemand => "residential infrastructure is insufficient",
        Indicator::Transportation if strong => "transit access is excellent",
        Indicator::Transportation => "transit access is inconvenient",
        Indicator::CulturePublic if strong => "cultural and public facilities are abundant",
        Indicator::CulturePublic => "cultural and public facilities are sparse",
    };

    IndicatorAssessment {
        indicator: indicator.label().to_owned(),
        score: round1(score),
        grade: ReportGrade::from_score(score),
        interpretation: format!("{band} - {reading}"),
    }
}

fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count_to_f64(count) / count_to_f64(total) * 100.0)
    }
}

fn poi_distribution(pois: &PoiCollection) -> PoiDistribution {
    let total_count = pois.total();
    let mut counts: Vec<(PoiGroup, usize)> = PoiGroup::ALL
        .into_iter()
        .map(|group| (group, pois.count(group)))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    PoiDistribution {
        total_count,
        density: Level::above(total_count, 100, 50),
        top_categories: counts
            .into_iter()
            .take(5)
            .map(|(group, count)| PoiShare {
                category: group.as_str().to_owned(),
                count,
                percentage: share(count, total_count),
            })
            .collect(),
    }
}

fn existing_status(existing: &ExistingFacilities) -> ExistingFacilitiesStatus {
    if existing.is_empty() {
        return ExistingFacilitiesStatus::NoData;
    }
    let total_count = existing.total();
    let saturation_level = match total_count {
        n if n > 30 => "saturated",
        n if n > 15 => "moderate",
        _ => "room available",
    };
    let mut facility_breakdown: Vec<FacilityShare> = existing
        .iter()
        .map(|(category, facilities)| FacilityShare {
            facility_type: category.label().to_owned(),
            count: facilities.len(),
            percentage: share(facilities.len(), total_count),
        })
        .collect();
    facility_breakdown.sort_by(|a, b| b.count.cmp(&a.count));

    ExistingFacilitiesStatus::Present {
        total_count,
        diversity: existing.category_count(),
        saturation_level: saturation_level.to_owned(),
        facility_breakdown,
    }
}

fn population_density(pois: &PoiCollection) -> PopulationDensity {
    let estimated_score = [
        PoiGroup::Schools,
        PoiGroup::Daycares,
        PoiGroup::Restaurants,
        PoiGroup::Cafes,
    ]
    .into_iter()
    .map(|group| pois.count(group))
    .sum();

    PopulationDensity {
        level: Level::above(estimated_score, 50, 20),
        estimated_score,
        basis: "schools, daycares, restaurants and cafes within the search radius".to_owned(),
    }
}

fn development_potential(
    config: &AnalysisConfig,
    indicators: &AreaIndicators,
    existing: &ExistingFacilities,
) -> DevelopmentPotential {
    let mean = if indicators.is_empty() {
        0.0
    } else {
        indicators.iter().map(|(_, raw)| raw).sum::<f64>() / count_to_f64(indicators.len())
    };
    let score = (normalised(config, mean) - 2.0 * count_to_f64(existing.total())).clamp(0.0, 100.0);
    let level = Level::at_least(score, 70.0, 40.0);
    let reasoning = match level {
        Level::High => "strong infrastructure with room for new facilities",
        Level::Medium => "adequate infrastructure; new facilities need targeting",
        Level::Low => "weak infrastructure or saturated supply",
    };

    DevelopmentPotential {
        score: round1(score),
        level,
        reasoning: reasoning.to_owned(),
    }
}
