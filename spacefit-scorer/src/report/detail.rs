//! Per-recommendation score decomposition and location assessment.

#![expect(
    clippy::float_arithmetic,
    reason = "score decomposition works in percentages"
)]

use serde::Serialize;
use spacefit_core::{
    AnalysisConfig, AreaIndicators, ExistingFacilities, FacilityCategory, FacilityRule,
    PoiCollection, round1,
};

use super::{Level, ReportGrade, ReportInput, normalised};
use crate::{Recommendation, base_score, existing_facility_penalty, poi_penalty};

/// One recommendation explained in detail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedRecommendation {
    /// Position in the ranking.
    pub rank: usize,
    /// Facility rule key.
    pub facility_type: String,
    /// Human-readable facility name.
    pub description: String,
    /// Final suitability, one decimal place.
    pub overall_score: f64,
    /// Report grade of the final suitability.
    pub grade: ReportGrade,
    /// How the score was assembled.
    pub scoring_detail: ScoringDetail,
    /// Strengths and weaknesses of the location for this facility.
    pub location_analysis: LocationSuitability,
    /// Reason string from the recommender.
    pub recommendation_basis: String,
    /// How realistic building the facility is.
    pub feasibility: Feasibility,
}

/// Score decomposition for one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringDetail {
    /// Normalised score before penalties.
    pub base_score: f64,
    /// Contribution of each weighted indicator, largest first.
    pub indicator_contributions: Vec<IndicatorContribution>,
    /// Penalties applied to the base score.
    pub penalties: PenaltySummary,
    /// Final suitability.
    pub final_score: f64,
}

/// Contribution of one indicator to a base score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorContribution {
    /// Indicator label.
    pub indicator: String,
    /// Raw indicator score.
    pub raw_score: f64,
    /// Weight configured for the facility.
    pub weight: f64,
    /// `raw_score * weight`.
    pub contribution: f64,
    /// Share of the raw base score, in percent.
    pub percentage: f64,
}

/// Source of a score penalty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyKind {
    /// Competing POIs near the location.
    NearbyPoi,
    /// Facilities already recorded in the snapshot.
    ExistingFacility,
}

/// One applied penalty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltyDetail {
    /// Penalty source.
    #[serde(rename = "type")]
    pub kind: PenaltyKind,
    /// What triggered the penalty.
    pub reason: String,
    /// Fraction removed, in percent.
    pub penalty_percentage: f64,
    /// Severity band.
    pub impact: Level,
}

/// All penalties applied to one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PenaltySummary {
    /// Sum of the individual percentages.
    pub total_penalty_percentage: f64,
    /// Individual penalties in application order.
    pub details: Vec<PenaltyDetail>,
}

/// Overall verdict on a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suitability {
    /// At least as many strengths as weaknesses.
    Suitable,
    /// More weaknesses than strengths.
    Average,
}

/// Strengths and weaknesses of a location for one facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationSuitability {
    /// Weighted indicators scoring 70 or more.
    pub strengths: Vec<String>,
    /// Weighted indicators scoring below 50.
    pub weaknesses: Vec<String>,
    /// Competing POIs counted for the penalty category.
    pub competition: Vec<String>,
    /// Overall verdict.
    pub overall_suitability: Suitability,
}

/// Feasibility assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feasibility {
    /// Final suitability, one decimal place.
    pub score: f64,
    /// Feasibility band.
    pub level: Level,
    /// Effect of facilities already on record.
    pub existing_facilities_impact: String,
    /// Suggested course of action.
    pub recommendation: String,
}

pub(super) fn build(config: &AnalysisConfig, input: &ReportInput<'_>) -> Vec<DetailedRecommendation> {
    input
        .recommendations
        .iter()
        .filter_map(|rec| {
            let rule = config.rule(&rec.facility_type)?;
            Some(detail(config, rec, rule, input))
        })
        .collect()
}

fn detail(
    config: &AnalysisConfig,
    rec: &Recommendation,
    rule: &FacilityRule,
    input: &ReportInput<'_>,
) -> DetailedRecommendation {
    DetailedRecommendation {
        rank: rec.rank,
        facility_type: rec.facility_type.clone(),
        description: rec.description.clone(),
        overall_score: round1(rec.score),
        grade: ReportGrade::from_score(rec.score),
        scoring_detail: ScoringDetail {
            base_score: round1(normalised(config, base_score(rule, input.indicators))),
            indicator_contributions: contributions(rule, input.indicators),
            penalties: penalties(&rec.facility_type, rule, input.pois, input.existing),
            final_score: round1(rec.score),
        },
        location_analysis: suitability(config, rule, input.indicators, input.pois),
        recommendation_basis: rec.reason.clone(),
        feasibility: feasibility(rec, input.existing),
    }
}

fn contributions(rule: &FacilityRule, indicators: &AreaIndicators) -> Vec<IndicatorContribution> {
    let base = base_score(rule, indicators);
    let mut rows: Vec<(f64, IndicatorContribution)> = rule
        .resolved_weights()
        .map(|(indicator, weight)| {
            let raw = indicators.score(indicator);
            let contribution = raw * weight;
            let percentage = if base > 0.0 {
                contribution / base * 100.0
            } else {
                0.0
            };
            (
                contribution,
                IndicatorContribution {
                    indicator: indicator.label().to_owned(),
                    raw_score: round1(raw),
                    weight,
                    contribution: round1(contribution),
                    percentage: round1(percentage),
                },
            )
        })
        .collect();
    rows.sort_by(|a, b| b.0.total_cmp(&a.0));
    rows.into_iter().map(|(_, row)| row).collect()
}

fn penalties(
    facility_type: &str,
    rule: &FacilityRule,
    pois: &PoiCollection,
    existing: &ExistingFacilities,
) -> PenaltySummary {
    let mut details = Vec::new();

    if let Some(code) = rule.penalty_code() {
        let count = pois.count(code.group());
        let amount = poi_penalty(count, rule.penalty_weight);
        details.push(PenaltyDetail {
            kind: PenaltyKind::NearbyPoi,
            reason: format!("{count} {} nearby", code.label()),
            penalty_percentage: round1(amount * 100.0),
            impact: if amount > 0.1 { Level::High } else { Level::Low },
        });
    }

    let recorded = FacilityCategory::for_facility_type(facility_type)
        .filter(|_| !existing.is_empty())
        .map(|category| {
            let count = existing.count(category);
            (category, count, existing_facility_penalty(count))
        })
        .filter(|(_, _, amount)| *amount > 0.0);
    if let Some((category, count, amount)) = recorded {
        details.push(PenaltyDetail {
            kind: PenaltyKind::ExistingFacility,
            reason: format!("{count} existing {} on record", category.noun()),
            penalty_percentage: round1(amount * 100.0),
            impact: Level::above(amount, 0.2, 0.1),
        });
    }

    PenaltySummary {
        total_penalty_percentage: round1(details.iter().map(|p| p.penalty_percentage).sum()),
        details,
    }
}

fn suitability(
    config: &AnalysisConfig,
    rule: &FacilityRule,
    indicators: &AreaIndicators,
    pois: &PoiCollection,
) -> LocationSuitability {
    let scored: Vec<_> = rule
        .resolved_weights()
        .map(|(indicator, _)| (indicator.label(), normalised(config, indicators.score(indicator))))
        .collect();

    let strengths: Vec<String> = scored
        .iter()
        .filter(|(_, score)| *score >= 70.0)
        .map(|(label, score)| format!("{label} excellent ({score:.1})"))
        .collect();
    let weaknesses: Vec<String> = scored
        .iter()
        .filter(|(_, score)| *score < 50.0)
        .map(|(label, score)| format!("{label} needs improvement ({score:.1})"))
        .collect();
    let competition = rule
        .penalty_code()
        .map(|code| format!("{} {}", pois.count(code.group()), code.label()))
        .into_iter()
        .collect();

    let overall_suitability = if strengths.len() >= weaknesses.len() {
        Suitability::Suitable
    } else {
        Suitability::Average
    };

    LocationSuitability {
        strengths,
        weaknesses,
        competition,
        overall_suitability,
    }
}

fn feasibility(rec: &Recommendation, existing: &ExistingFacilities) -> Feasibility {
    let count = FacilityCategory::for_facility_type(&rec.facility_type)
        .map_or(0, |category| existing.count(category));
    let level = Level::at_least(rec.score, 70.0, 50.0);

    let existing_facilities_impact = if count > 3 {
        "existing facilities saturated"
    } else if count > 0 {
        "existing facilities present"
    } else {
        "high new demand"
    };
    let recommendation = match level {
        Level::High => "actively pursue",
        Level::Medium => "pursue conditionally",
        Level::Low => "review carefully",
    };

    Feasibility {
        score: round1(rec.score),
        level,
        existing_facilities_impact: existing_facilities_impact.to_owned(),
        recommendation: recommendation.to_owned(),
    }
}
