use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lifecycle stage of a risk appetite statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatementStatus {
    Draft,
    Approved,
    Superseded,
}

impl StatementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Approved => "APPROVED",
            Self::Superseded => "SUPERSEDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(Self::Draft),
            "APPROVED" => Some(Self::Approved),
            "SUPERSEDED" => Some(Self::Superseded),
            _ => None,
        }
    }
}

impl fmt::Display for StatementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative risk-taking stance for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppetiteLevel {
    Zero,
    Low,
    Moderate,
    High,
}

impl AppetiteLevel {
    pub const ALL: [AppetiteLevel; 4] = [Self::Zero, Self::Low, Self::Moderate, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "ZERO",
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::High => "HIGH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ZERO" => Some(Self::Zero),
            "LOW" => Some(Self::Low),
            "MODERATE" => Some(Self::Moderate),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

impl fmt::Display for AppetiteLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A versioned risk appetite statement owned by one organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppetiteStatement {
    pub id: String,
    pub organization_id: String,
    /// Monotonically increasing per organization, starting at 1.
    pub version: u32,
    pub statement_text: String,
    pub effective_from: NaiveDate,
    pub status: StatementStatus,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    /// Successor statement id, set when this one is superseded.
    pub superseded_by: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    /// Optimistic-lock counter, bumped on every write.
    pub row_version: i64,
}

/// Input for creating a new DRAFT statement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewStatement {
    pub organization_id: String,
    pub statement_text: String,
    pub effective_from: NaiveDate,
    pub created_by: String,
}

/// One appetite entry of a statement, keyed by risk category name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppetiteCategory {
    pub id: String,
    pub statement_id: String,
    pub category_name: String,
    pub appetite_level: AppetiteLevel,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

/// Input for adding an appetite category to a statement.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewAppetiteCategory {
    pub statement_id: String,
    pub category_name: String,
    pub appetite_level: AppetiteLevel,
    pub rationale: String,
}

/// Result of the atomic statement supersede procedure.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatementSupersession {
    pub superseded: AppetiteStatement,
    pub successor: AppetiteStatement,
    /// Ids of the appetite categories moved onto the successor.
    pub migrated_category_ids: Vec<String>,
}
