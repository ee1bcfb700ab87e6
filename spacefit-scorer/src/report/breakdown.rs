use serde::Serialize;
use spacefit_core::{AnalysisConfig, Indicator, round1};

use super::{Level, ReportInput};

/// Score of one top-three facility against the leader.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComparison {
    /// Position in the ranking.
    pub rank: usize,
    /// Facility rule key.
    pub facility_type: String,
    /// Suitability, one decimal place.
    pub score: f64,
    /// Points behind the first recommendation.
    pub score_difference_from_top: f64,
}

/// How many recommendations lean on an indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorImportance {
    /// Indicator label.
    pub indicator: String,
    /// Recommendations weighting the indicator above 0.3.
    pub used_in_count: usize,
    /// Importance band.
    pub importance: Level,
}

/// Recommendations per score bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ScoreDistribution {
    /// 80 and above.
    pub excellent: usize,
    /// 60 to below 80.
    pub good: usize,
    /// 40 to below 60.
    pub fair: usize,
    /// Below 40.
    pub poor: usize,
}

/// Score comparison section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringBreakdown {
    /// The first three recommendations.
    pub top_3_comparison: Vec<ScoreComparison>,
    /// Indicators ordered by how many recommendations use them.
    pub indicator_importance: Vec<IndicatorImportance>,
    /// Bucketed scores.
    pub score_distribution: ScoreDistribution,
}

const IMPORTANT_WEIGHT: f64 = 0.3;

pub(super) fn build(config: &AnalysisConfig, input: &ReportInput<'_>) -> ScoringBreakdown {
    let recommendations = input.recommendations;
    let top = recommendations.first().map_or(0.0, |rec| rec.score);

    let top_3_comparison = recommendations
        .iter()
        .take(3)
        .map(|rec| ScoreComparison {
            rank: rec.rank,
            facility_type: rec.facility_type.clone(),
            score: round1(rec.score),
            score_difference_from_top: difference(top, rec.score),
        })
        .collect();

    let mut indicator_importance: Vec<IndicatorImportance> = Indicator::ALL
        .into_iter()
        .map(|indicator| {
            let used_in_count = recommendations
                .iter()
                .filter_map(|rec| config.rule(&rec.facility_type))
                .filter(|rule| rule.weight(indicator) > IMPORTANT_WEIGHT)
                .count();
            IndicatorImportance {
                indicator: indicator.label().to_owned(),
                used_in_count,
                importance: Level::above(used_in_count, 5, 2),
            }
        })
        .collect();
    indicator_importance.sort_by(|a, b| b.used_in_count.cmp(&a.used_in_count));

    let score_distribution =
        recommendations
            .iter()
            .fold(ScoreDistribution::default(), |mut buckets, rec| {
                match rec.score {
                    s if s >= 80.0 => buckets.excellent += 1,
                    s if s >= 60.0 => buckets.good += 1,
                    s if s >= 40.0 => buckets.fair += 1,
                    _ => buckets.poor += 1,
                }
                buckets
            });

    ScoringBreakdown {
        top_3_comparison,
        indicator_importance,
        score_distribution,
    }
}

#[expect(clippy::float_arithmetic, reason = "score gap")]
fn difference(top: f64, score: f64) -> f64 {
    round1(top - score)
}
