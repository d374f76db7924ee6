use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An external supervisory body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Regulator {
    pub id: String,
    pub name: String,
    pub jurisdiction: String,
    pub contact_email: String,
    pub created_at: DateTime<Utc>,
}

/// A regulator's read access to one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegulatorAccess {
    pub regulator_id: String,
    pub organization_id: String,
    pub granted_by: String,
    pub granted_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RegulatorAccess {
    pub fn is_active(&self) -> bool {
        self.revoked_at.is_none()
    }
}
