use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A node of an organization's risk taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskCategory {
    pub id: String,
    pub organization_id: String,
    pub name: String,
    /// Parent category for sub-categories; `None` at the top level.
    pub parent_id: Option<String>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a risk category.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewRiskCategory {
    pub organization_id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub description: String,
}

/// Normalize a category name for matching across tables.
pub fn normalize_category_name(name: &str) -> String {
    name.trim().to_lowercase()
}
