use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How serious a break in the appetite→tolerance chain is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GapSeverity {
    /// Metrics exist but none is active.
    Medium,
    /// Appetite exists but no tolerance metric at all.
    High,
    /// No appetite entry for the category.
    Critical,
}

impl fmt::Display for GapSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChainGap {
    pub category_name: String,
    pub severity: GapSeverity,
    pub issue: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ChainValidationResult {
    pub is_valid: bool,
    /// Statement the chain was evaluated against, if any.
    pub statement_id: Option<String>,
    pub checked_categories: u32,
    pub gaps: Vec<ChainGap>,
}

impl ChainValidationResult {
    pub fn critical_gaps(&self) -> impl Iterator<Item = &ChainGap> {
        self.gaps
            .iter()
            .filter(|g| g.severity == GapSeverity::Critical)
    }
}
