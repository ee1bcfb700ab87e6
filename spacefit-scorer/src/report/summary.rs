use serde::Serialize;
use spacefit_core::{AnalysisConfig, round1};

use super::{ReportInput, normalised};

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

/// Best-ranked facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopRecommendation {
    /// Facility rule key.
    pub facility_type: String,
    /// Suitability, one decimal place.
    pub score: f64,
    /// Human-readable facility name.
    pub description: String,
}

/// Highest-scoring indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrongestCharacteristic {
    /// Indicator label.
    pub indicator: String,
    /// Normalised score, one decimal place.
    pub score: f64,
}

/// Headline section of the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Analysed address.
    pub location: String,
    /// Analysed position.
    pub coordinates: Coordinates,
    /// Analysis time as `YYYY-MM-DD HH:MM`.
    pub analysis_date: String,
    /// Best-ranked facility, absent when nothing was recommended.
    pub top_recommendation: Option<TopRecommendation>,
    /// Highest indicator, absent when no indicator was computed.
    pub strongest_characteristic: Option<StrongestCharacteristic>,
    /// Number of recommendations in the report.
    pub total_facilities_analyzed: usize,
}

pub(super) fn build(config: &AnalysisConfig, input: &ReportInput<'_>) -> Summary {
    Summary {
        location: input.location.address.clone(),
        coordinates: Coordinates {
            lat: input.location.lat(),
            lng: input.location.lng(),
        },
        analysis_date: input.analysed_at.format("%Y-%m-%d %H:%M").to_string(),
        top_recommendation: input.recommendations.first().map(|top| TopRecommendation {
            facility_type: top.facility_type.clone(),
            score: round1(top.score),
            description: top.description.clone(),
        }),
        strongest_characteristic: input.indicators.strongest().map(|(indicator, raw)| {
            StrongestCharacteristic {
                indicator: indicator.label().to_owned(),
                score: round1(normalised(config, raw)),
            }
        }),
        total_facilities_analyzed: input.recommendations.len(),
    }
}
