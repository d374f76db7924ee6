use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Entity families tracked in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntity {
    AppetiteStatement,
    AppetiteCategory,
    ToleranceMetric,
    RiskCategory,
    Organization,
    Division,
    Department,
    Invitation,
    User,
    Regulator,
    Library,
}

impl AuditEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppetiteStatement => "appetite_statement",
            Self::AppetiteCategory => "appetite_category",
            Self::ToleranceMetric => "tolerance_metric",
            Self::RiskCategory => "risk_category",
            Self::Organization => "organization",
            Self::Division => "division",
            Self::Department => "department",
            Self::Invitation => "invitation",
            Self::User => "user",
            Self::Regulator => "regulator",
            Self::Library => "library",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "appetite_statement" => Some(Self::AppetiteStatement),
            "appetite_category" => Some(Self::AppetiteCategory),
            "tolerance_metric" => Some(Self::ToleranceMetric),
            "risk_category" => Some(Self::RiskCategory),
            "organization" => Some(Self::Organization),
            "division" => Some(Self::Division),
            "department" => Some(Self::Department),
            "invitation" => Some(Self::Invitation),
            "user" => Some(Self::User),
            "regulator" => Some(Self::Regulator),
            "library" => Some(Self::Library),
            _ => None,
        }
    }
}

impl fmt::Display for AuditEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations tracked in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AuditOperation {
    Create,
    Update,
    Delete,
    Approve,
    Supersede,
    Migrate,
    Activate,
    Deactivate,
    Accept,
    Reject,
    Revoke,
    Expire,
    Grant,
    Suspend,
    Reactivate,
    Generate,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Approve => "approve",
            Self::Supersede => "supersede",
            Self::Migrate => "migrate",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Revoke => "revoke",
            Self::Expire => "expire",
            Self::Grant => "grant",
            Self::Suspend => "suspend",
            Self::Reactivate => "reactivate",
            Self::Generate => "generate",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "approve" => Some(Self::Approve),
            "supersede" => Some(Self::Supersede),
            "migrate" => Some(Self::Migrate),
            "activate" => Some(Self::Activate),
            "deactivate" => Some(Self::Deactivate),
            "accept" => Some(Self::Accept),
            "reject" => Some(Self::Reject),
            "revoke" => Some(Self::Revoke),
            "expire" => Some(Self::Expire),
            "grant" => Some(Self::Grant),
            "suspend" => Some(Self::Suspend),
            "reactivate" => Some(Self::Reactivate),
            "generate" => Some(Self::Generate),
            _ => None,
        }
    }
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry in the append-only, hash-chained audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditEntry {
    pub id: i64,
    pub organization_id: Option<String>,
    pub entity_type: AuditEntity,
    pub entity_id: String,
    pub operation: AuditOperation,
    pub actor: String,
    /// JSON details about the operation.
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
    pub prev_hash: String,
    pub entry_hash: String,
}

/// Filter for audit-trail queries. Unset fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditQuery {
    pub organization_id: Option<String>,
    pub entity_type: Option<AuditEntity>,
    pub entity_id: Option<String>,
    pub actor: Option<String>,
    pub operation: Option<AuditOperation>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Outcome of re-hashing the audit chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuditChainReport {
    pub entries_checked: u64,
    /// First entry whose stored hash does not match its recomputed hash.
    pub first_broken_id: Option<i64>,
}

impl AuditChainReport {
    pub fn is_intact(&self) -> bool {
        self.first_broken_id.is_none()
    }
}
