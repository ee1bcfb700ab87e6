//! Narrative report explaining a set of facility recommendations.
//!
//! [`FacilityReportGenerator::generate`] is a pure function of its inputs:
//! the analysis timestamp is supplied by the caller, so identical inputs
//! always produce identical reports. Each of the six sections is built by its
//! own submodule and none depends on another's output.

mod area;
mod breakdown;
mod comparison;
mod conclusion;
mod detail;
mod summary;

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use spacefit_core::{
    AnalysisConfig, AreaIndicators, ExistingFacilities, Location, PoiCollection, normalise_score,
};

use crate::Recommendation;

pub use area::{
    AreaCharacterisation, DevelopmentPotential, ExistingFacilitiesStatus, FacilityShare,
    IndicatorAssessment, LocationType, PoiDistribution, PoiShare, PopulationDensity,
};
pub use breakdown::{IndicatorImportance, ScoreComparison, ScoreDistribution, ScoringBreakdown};
pub use comparison::{
    CategoryLeader, ComparativeAnalysis, Competitiveness, RankedFacility, ScoreRange, TopVsBottom,
};
pub use conclusion::{Conclusion, FacilityOption, NEXT_STEPS};
pub use detail::{
    DetailedRecommendation, Feasibility, IndicatorContribution, LocationSuitability,
    PenaltyDetail, PenaltyKind, PenaltySummary, ScoringDetail, Suitability,
};
pub use summary::{Coordinates, StrongestCharacteristic, Summary, TopRecommendation};

/// Grade scale used inside reports; adds `S` above `A+` and stops at `D`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportGrade {
    /// 90 and above.
    #[serde(rename = "S")]
    S,
    /// 80 to below 90.
    #[serde(rename = "A+")]
    APlus,
    /// 70 to below 80.
    #[serde(rename = "A")]
    A,
    /// 60 to below 70.
    #[serde(rename = "B+")]
    BPlus,
    /// 50 to below 60.
    #[serde(rename = "B")]
    B,
    /// 40 to below 50.
    #[serde(rename = "C")]
    C,
    /// Below 40.
    #[serde(rename = "D")]
    D,
}

impl ReportGrade {
    /// Grade a normalised score.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::S,
            s if s >= 80.0 => Self::APlus,
            s if s >= 70.0 => Self::A,
            s if s >= 60.0 => Self::BPlus,
            s if s >= 50.0 => Self::B,
            s if s >= 40.0 => Self::C,
            _ => Self::D,
        }
    }
}

/// Three-step qualitative level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// High.
    High,
    /// Medium.
    Medium,
    /// Low.
    Low,
}

impl Level {
    /// `High` above `high`, `Medium` above `medium`, otherwise `Low`.
    #[must_use]
    pub fn above<T: PartialOrd>(value: T, high: T, medium: T) -> Self {
        if value > high {
            Self::High
        } else if value > medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// `High` at or above `high`, `Medium` at or above `medium`, otherwise `Low`.
    #[must_use]
    pub fn at_least(value: f64, high: f64, medium: f64) -> Self {
        if value >= high {
            Self::High
        } else if value >= medium {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Complete facility report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityReport {
    /// Headline figures.
    pub summary: Summary,
    /// Per-recommendation score decomposition and assessment.
    pub detailed_recommendations: Vec<DetailedRecommendation>,
    /// Characterisation of the analysed area.
    pub area_analysis: AreaCharacterisation,
    /// Score comparison and distribution.
    pub scoring_breakdown: ScoringBreakdown,
    /// Spread and leaders across recommendations.
    pub comparative_analysis: ComparativeAnalysis,
    /// Top picks, considerations and next steps.
    pub conclusion: Conclusion,
}

/// Everything a report is derived from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    /// Ranked recommendations, best first.
    pub recommendations: &'a [Recommendation],
    /// Raw indicator scores.
    pub indicators: &'a AreaIndicators,
    /// POIs retrieved around the location.
    pub pois: &'a PoiCollection,
    /// Existing-facility snapshot.
    pub existing: &'a ExistingFacilities,
    /// Analysed location.
    pub location: &'a Location,
    /// When the analysis ran.
    pub analysed_at: NaiveDateTime,
}

/// Build [`FacilityReport`]s from recommendation results.
#[derive(Debug, Clone)]
pub struct FacilityReportGenerator {
    config: Arc<AnalysisConfig>,
}

impl FacilityReportGenerator {
    /// Build a generator over shared configuration.
    #[must_use]
    pub const fn new(config: Arc<AnalysisConfig>) -> Self {
        Self { config }
    }

    /// Derive the six report sections from `input`.
    #[must_use]
    pub fn generate(&self, input: &ReportInput<'_>) -> FacilityReport {
        let config = self.config.as_ref();
        FacilityReport {
            summary: summary::build(config, input),
            detailed_recommendations: detail::build(config, input),
            area_analysis: area::build(config, input),
            scoring_breakdown: breakdown::build(config, input),
            comparative_analysis: comparison::build(input.recommendations),
            conclusion: conclusion::build(config, input),
        }
    }
}

/// Normalise a raw indicator score with the indicator scale.
fn normalised(config: &AnalysisConfig, raw: f64) -> f64 {
    normalise_score(raw, config.scoring.max_possible_score)
}

#[cfg(test)]
mod tests;
