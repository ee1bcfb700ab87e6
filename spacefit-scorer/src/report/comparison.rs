use serde::Serialize;
use spacefit_core::{count_to_f64, round1};

use crate::Recommendation;

/// Facility families compared in the category leaders table.
const FAMILIES: [(&str, &[&str]); 4] = [
    ("resident convenience", &["community_center", "senior_center"]),
    ("education & childcare", &["daycare", "library"]),
    ("leisure & health", &["park", "sports_facility", "playground"]),
    ("infrastructure", &["parking_lot", "health_facility"]),
];

/// Gap above which the first recommendation is a clear priority.
const CLEAR_PRIORITY_GAP: f64 = 30.0;

/// A facility referenced by the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedFacility {
    /// Human-readable facility name.
    #[serde(rename = "type")]
    pub description: String,
    /// Suitability, one decimal place.
    pub score: f64,
}

/// First against last recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopVsBottom {
    /// First recommendation.
    pub top: RankedFacility,
    /// Last recommendation.
    pub bottom: RankedFacility,
    /// Score gap, one decimal place.
    pub gap: f64,
    /// Reading of the gap.
    pub interpretation: String,
}

/// Best-scoring recommendation of one facility family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLeader {
    /// Family name.
    pub category: String,
    /// Leading facility's human-readable name.
    pub leader: String,
    /// Leader's suitability, one decimal place.
    pub score: f64,
}

/// Lowest and highest recommendation scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRange {
    /// Lowest score.
    pub min: f64,
    /// Highest score.
    pub max: f64,
}

/// Spread of recommendation scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitiveness {
    /// Mean score, one decimal place.
    pub average_score: f64,
    /// Population standard deviation, one decimal place.
    pub standard_deviation: f64,
    /// Reading of the spread.
    pub competitiveness: String,
    /// Score range, absent when nothing was recommended.
    pub score_range: Option<ScoreRange>,
}

/// Comparative analysis section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparativeAnalysis {
    /// Absent with fewer than two recommendations.
    pub top_vs_bottom: Option<TopVsBottom>,
    /// Leaders of the families that have a recommendation.
    pub category_leaders: Vec<CategoryLeader>,
    /// Score spread.
    pub competitiveness: Competitiveness,
}

pub(super) fn build(recommendations: &[Recommendation]) -> ComparativeAnalysis {
    ComparativeAnalysis {
        top_vs_bottom: top_vs_bottom(recommendations),
        category_leaders: category_leaders(recommendations),
        competitiveness: competitiveness(recommendations),
    }
}

fn ranked(rec: &Recommendation) -> RankedFacility {
    RankedFacility {
        description: rec.description.clone(),
        score: round1(rec.score),
    }
}

#[expect(clippy::float_arithmetic, reason = "score gap")]
fn top_vs_bottom(recommendations: &[Recommendation]) -> Option<TopVsBottom> {
    if recommendations.len() < 2 {
        return None;
    }
    let top = recommendations.first()?;
    let bottom = recommendations.last()?;
    let gap = top.score - bottom.score;
    let interpretation = if gap > CLEAR_PRIORITY_GAP {
        "clear priority"
    } else {
        "several competitive options"
    };
    Some(TopVsBottom {
        top: ranked(top),
        bottom: ranked(bottom),
        gap: round1(gap),
        interpretation: interpretation.to_owned(),
    })
}

fn category_leaders(recommendations: &[Recommendation]) -> Vec<CategoryLeader> {
    FAMILIES
        .iter()
        .filter_map(|(family, members)| {
            recommendations
                .iter()
                .filter(|rec| members.contains(&rec.facility_type.as_str()))
                .fold(None::<&Recommendation>, |best, rec| match best {
                    Some(current) if current.score >= rec.score => Some(current),
                    _ => Some(rec),
                })
                .map(|leader| CategoryLeader {
                    category: (*family).to_owned(),
                    leader: leader.description.clone(),
                    score: round1(leader.score),
                })
        })
        .collect()
}

#[expect(clippy::float_arithmetic, reason = "mean and deviation")]
fn competitiveness(recommendations: &[Recommendation]) -> Competitiveness {
    let scores: Vec<f64> = recommendations.iter().map(|rec| rec.score).collect();
    let (average, deviation) = if scores.is_empty() {
        (0.0, 0.0)
    } else {
        let n = count_to_f64(scores.len());
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        (mean, variance.sqrt())
    };
    let reading = if deviation < 10.0 {
        "highly competitive (scores close)"
    } else if deviation < 20.0 {
        "competitive"
    } else {
        "clear ranking"
    };
    let score_range = scores.iter().copied().fold(None, |range, s| {
        Some(match range {
            None => ScoreRange { min: s, max: s },
            Some(ScoreRange { min, max }) => ScoreRange {
                min: min.min(s),
                max: max.max(s),
            },
        })
    });

    Competitiveness {
        average_score: round1(average),
        standard_deviation: round1(deviation),
        competitiveness: reading.to_owned(),
        score_range: score_range.map(|range| ScoreRange {
            min: round1(range.min),
            max: round1(range.max),
        }),
    }
}
