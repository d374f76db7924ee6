use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Design / Implementation / Monitoring / Evaluation scores, each 0–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimeScores {
    pub design: u8,
    pub implementation: u8,
    pub monitoring: u8,
    pub evaluation: u8,
}

impl DimeScores {
    pub fn axes(&self) -> [(&'static str, u8); 4] {
        [
            ("design", self.design),
            ("implementation", self.implementation),
            ("monitoring", self.monitoring),
            ("evaluation", self.evaluation),
        ]
    }

    /// Mean across all 4 axes.
    pub fn average(&self) -> f64 {
        self.axes().iter().map(|(_, score)| f64::from(*score)).sum::<f64>() / 4.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlEffectiveness {
    Effective,
    PartiallyEffective,
    Ineffective,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimeAssessment {
    pub scores: DimeScores,
    pub overall: f64,
    pub rating: ControlEffectiveness,
}
