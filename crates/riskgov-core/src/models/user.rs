use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{AdminError, RiskGovError, RiskGovResult};

/// Platform roles, highest privilege first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    PrimaryAdmin,
    SecondaryAdmin,
    User,
    Viewer,
    Regulator,
}

/// Actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ManageOrganizations,
    ManageRegulators,
    GrantRegulatorAccess,
    InviteUsers,
    ApproveUsers,
    ManageStructure,
    ManageTaxonomy,
    EditAppetite,
    ApproveAppetite,
    ManageTolerance,
    GenerateLibrary,
    ViewAuditTrail,
    ViewGovernance,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ManageOrganizations => "manage organizations",
            Self::ManageRegulators => "manage regulators",
            Self::GrantRegulatorAccess => "grant regulator access",
            Self::InviteUsers => "invite users",
            Self::ApproveUsers => "approve users",
            Self::ManageStructure => "manage structure",
            Self::ManageTaxonomy => "manage taxonomy",
            Self::EditAppetite => "edit appetite",
            Self::ApproveAppetite => "approve appetite",
            Self::ManageTolerance => "manage tolerance",
            Self::GenerateLibrary => "generate library",
            Self::ViewAuditTrail => "view audit trail",
            Self::ViewGovernance => "view governance",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::PrimaryAdmin => "primary_admin",
            Self::SecondaryAdmin => "secondary_admin",
            Self::User => "user",
            Self::Viewer => "viewer",
            Self::Regulator => "regulator",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "super_admin" => Some(Self::SuperAdmin),
            "primary_admin" => Some(Self::PrimaryAdmin),
            "secondary_admin" => Some(Self::SecondaryAdmin),
            "user" => Some(Self::User),
            "viewer" => Some(Self::Viewer),
            "regulator" => Some(Self::Regulator),
            _ => None,
        }
    }

    /// Whether this role may perform `capability`.
    pub fn can(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Self::SuperAdmin => true,
            Self::PrimaryAdmin => !matches!(capability, ManageOrganizations | ManageRegulators),
            Self::SecondaryAdmin => matches!(
                capability,
                InviteUsers
                    | ManageStructure
                    | ManageTaxonomy
                    | EditAppetite
                    | ManageTolerance
                    | GenerateLibrary
                    | ViewAuditTrail
                    | ViewGovernance
            ),
            Self::User => matches!(capability, EditAppetite | ManageTolerance | ViewGovernance),
            Self::Viewer => matches!(capability, ViewGovernance),
            Self::Regulator => matches!(capability, ViewAuditTrail | ViewGovernance),
        }
    }

    /// Tenant admin ladder. Regulators sit outside it.
    fn rank(&self) -> u8 {
        match self {
            Self::SuperAdmin => 5,
            Self::PrimaryAdmin => 4,
            Self::SecondaryAdmin => 3,
            Self::User => 2,
            Self::Viewer => 1,
            Self::Regulator => 0,
        }
    }

    /// Whether this role may hand out `target` through an invitation.
    pub fn can_assign(&self, target: Role) -> bool {
        match target {
            Self::SuperAdmin => false,
            Self::Regulator => *self == Self::SuperAdmin,
            _ => self.can(Capability::InviteUsers) && self.rank() > target.rank(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller identity passed explicitly into every service operation.
///
/// For regulators `organization_id` is the regulator id until the session is
/// narrowed to one granted organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionContext {
    pub user_id: String,
    pub organization_id: String,
    pub role: Role,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, organization_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            organization_id: organization_id.into(),
            role,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// `PermissionDenied` unless the role grants `capability`.
    pub fn require(&self, capability: Capability) -> RiskGovResult<()> {
        if self.can(capability) {
            return Ok(());
        }
        Err(self.denied(capability.as_str()))
    }

    /// Super admins reach every tenant; everyone else only their own.
    pub fn can_access_organization(&self, organization_id: &str) -> bool {
        self.role == Role::SuperAdmin || self.organization_id == organization_id
    }

    /// `require` plus tenant isolation.
    pub fn require_in(&self, capability: Capability, organization_id: &str) -> RiskGovResult<()> {
        self.require(capability)?;
        if !self.can_access_organization(organization_id) {
            return Err(self.denied(&format!("{capability} in organization {organization_id}")));
        }
        Ok(())
    }

    pub fn denied(&self, action: &str) -> RiskGovError {
        AdminError::PermissionDenied {
            role: self.role.to_string(),
            action: action.to_string(),
        }
        .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    PendingApproval,
    Active,
    Rejected,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Active => "ACTIVE",
            Self::Rejected => "REJECTED",
            Self::Suspended => "SUSPENDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING_APPROVAL" => Some(Self::PendingApproval),
            "ACTIVE" => Some(Self::Active),
            "REJECTED" => Some(Self::Rejected),
            "SUSPENDED" => Some(Self::Suspended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: String,
    pub organization_id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}
