use serde::Serialize;
use spacefit_core::{AnalysisConfig, count_to_f64};

use super::{ReportInput, normalised};
use crate::Recommendation;

/// Steps suggested after every analysis.
pub const NEXT_STEPS: [&str; 4] = [
    "collect resident feedback and survey demand",
    "select a site and review feasibility",
    "plan the budget and secure funding",
    "proceed with design and permitting",
];

const MAX_CONSIDERATIONS: usize = 4;

/// A facility put forward in the conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacilityOption {
    /// Human-readable facility name.
    pub facility: String,
    /// Why it is put forward.
    pub reason: String,
}

/// Closing section of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conclusion {
    /// First recommendation, absent when nothing was recommended.
    pub primary_recommendation: Option<FacilityOption>,
    /// Second and third recommendations.
    pub alternative_options: Vec<FacilityOption>,
    /// At most four points to weigh before deciding.
    pub key_considerations: Vec<String>,
    /// Fixed follow-up steps.
    pub next_steps: Vec<String>,
}

pub(super) fn build(config: &AnalysisConfig, input: &ReportInput<'_>) -> Conclusion {
    let recommendations = input.recommendations;
    Conclusion {
        primary_recommendation: recommendations
            .first()
            .map(|top| primary(config, top)),
        alternative_options: recommendations
            .iter()
            .skip(1)
            .take(2)
            .map(|rec| FacilityOption {
                facility: rec.description.clone(),
                reason: format!("{}: {}", rec.facility_type, rec.reason),
            })
            .collect(),
        key_considerations: considerations(config, input),
        next_steps: NEXT_STEPS.iter().map(|step| (*step).to_owned()).collect(),
    }
}

fn primary(config: &AnalysisConfig, top: &Recommendation) -> FacilityOption {
    let reason = config.rule(&top.facility_type).map_or_else(
        || top.reason.clone(),
        |rule| {
            let strengths: Vec<String> = rule
                .top_indicators(2)
                .into_iter()
                .map(|(indicator, _)| format!("{} excellent", indicator.label()))
                .collect();
            format!("{} - the best fit for this area.", strengths.join(", "))
        },
    );
    FacilityOption {
        facility: top.description.clone(),
        reason,
    }
}

#[expect(clippy::float_arithmetic, reason = "mean of the leading scores")]
fn considerations(config: &AnalysisConfig, input: &ReportInput<'_>) -> Vec<String> {
    let mut notes: Vec<String> = input
        .indicators
        .iter()
        .map(|(indicator, raw)| (indicator, normalised(config, raw)))
        .filter(|(_, score)| *score < 50.0)
        .map(|(indicator, score)| {
            format!("{} needs improvement (currently {score:.1})", indicator.label())
        })
        .collect();

    let leading: Vec<f64> = input
        .recommendations
        .iter()
        .take(3)
        .map(|rec| rec.score)
        .collect();
    if !leading.is_empty() {
        let average = leading.iter().sum::<f64>() / count_to_f64(leading.len());
        if average < 60.0 {
            notes.push(
                "overall suitability is moderate - consider a multi-purpose facility".to_owned(),
            );
        }
    }

    if notes.is_empty() {
        notes.push("gathering resident input is essential".to_owned());
    }
    notes.truncate(MAX_CONSIDERATIONS);
    notes
}
