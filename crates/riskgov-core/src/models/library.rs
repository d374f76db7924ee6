use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Kind of reusable library item. Each kind has its own target table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LibraryItemType {
    RootCause,
    Impact,
    Control,
    Kri,
    Kci,
}

impl LibraryItemType {
    pub const ALL: [LibraryItemType; 5] = [
        Self::RootCause,
        Self::Impact,
        Self::Control,
        Self::Kri,
        Self::Kci,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RootCause => "root_cause",
            Self::Impact => "impact",
            Self::Control => "control",
            Self::Kri => "kri",
            Self::Kci => "kci",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "root_cause" => Some(Self::RootCause),
            "impact" => Some(Self::Impact),
            "control" => Some(Self::Control),
            "kri" => Some(Self::Kri),
            "kci" => Some(Self::Kci),
            _ => None,
        }
    }

    /// Organization-scoped table this item type is copied into.
    pub fn target_table(&self) -> &'static str {
        match self {
            Self::RootCause => "root_cause_library",
            Self::Impact => "impact_library",
            Self::Control => "control_library",
            Self::Kri => "kri_library",
            Self::Kci => "kci_library",
        }
    }
}

impl fmt::Display for LibraryItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row of the shared seed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeedItem {
    /// Natural key, unique across the catalog.
    pub code: String,
    pub item_type: LibraryItemType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_hints: Vec<String>,
    #[serde(default)]
    pub industry_tags: Vec<String>,
}

/// A library item copied into an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LibraryItem {
    pub organization_id: String,
    pub code: String,
    pub item_type: LibraryItemType,
    pub title: String,
    pub description: String,
    pub updated_at: DateTime<Utc>,
}

/// Items written per type in one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationCounts {
    pub root_cause: u32,
    pub impact: u32,
    pub control: u32,
    pub kri: u32,
    pub kci: u32,
}

impl GenerationCounts {
    pub fn add(&mut self, item_type: LibraryItemType, n: u32) {
        match item_type {
            LibraryItemType::RootCause => self.root_cause += n,
            LibraryItemType::Impact => self.impact += n,
            LibraryItemType::Control => self.control += n,
            LibraryItemType::Kri => self.kri += n,
            LibraryItemType::Kci => self.kci += n,
        }
    }

    pub fn get(&self, item_type: LibraryItemType) -> u32 {
        match item_type {
            LibraryItemType::RootCause => self.root_cause,
            LibraryItemType::Impact => self.impact,
            LibraryItemType::Control => self.control,
            LibraryItemType::Kri => self.kri,
            LibraryItemType::Kci => self.kci,
        }
    }

    pub fn total(&self) -> u32 {
        self.root_cause + self.impact + self.control + self.kri + self.kci
    }
}

/// One row of the generation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GenerationLog {
    pub id: String,
    pub organization_id: String,
    pub categories: Vec<String>,
    pub industry: Option<String>,
    pub counts: GenerationCounts,
    pub generated_by: String,
    pub created_at: DateTime<Utc>,
}
