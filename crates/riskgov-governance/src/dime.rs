//! DIME control-effectiveness scoring.
//!
//! Design, Implementation, Monitoring, and Evaluation are each scored 0–3.

use riskgov_core::constants::DIME_MAX_SCORE;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{ControlEffectiveness, DimeAssessment, DimeScores};

/// Overall mean at or above which a control can be rated effective.
pub const EFFECTIVE_THRESHOLD: f64 = 2.5;
/// Overall mean at or above which a control is at least partially effective.
pub const PARTIAL_THRESHOLD: f64 = 1.5;

/// Score a control. A zero on any axis caps the rating at partially effective.
pub fn assess(scores: DimeScores) -> RiskGovResult<DimeAssessment> {
    for (axis, score) in scores.axes() {
        if score > DIME_MAX_SCORE {
            return Err(RiskGovError::validation(
                axis,
                format!("score {score} exceeds maximum {DIME_MAX_SCORE}"),
            ));
        }
    }
    let overall = scores.average();
    Ok(DimeAssessment {
        scores,
        overall,
        rating: rate(&scores, overall),
    })
}

fn rate(scores: &DimeScores, overall: f64) -> ControlEffectiveness {
    let any_zero = scores.axes().iter().any(|(_, s)| *s == 0);
    if overall >= EFFECTIVE_THRESHOLD && !any_zero {
        ControlEffectiveness::Effective
    } else if overall >= PARTIAL_THRESHOLD {
        ControlEffectiveness::PartiallyEffective
    } else {
        ControlEffectiveness::Ineffective
    }
}
