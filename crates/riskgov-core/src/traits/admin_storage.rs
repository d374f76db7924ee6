use chrono::{DateTime, Utc};

use crate::errors::RiskGovResult;
use crate::models::{
    Department, Division, InvitationStatus, Organization, OrganizationStatus,
    OrganizationSummary, Regulator, RegulatorAccess, UserInvitation, UserProfile, UserStatus,
};

/// Organizations, structure, invitations/users, and regulators.
pub trait IAdminStorage: Send + Sync {
    // --- Organizations ---
    fn create_organization(&self, org: &Organization, actor: &str) -> RiskGovResult<()>;
    fn get_organization(&self, id: &str) -> RiskGovResult<Option<Organization>>;
    fn find_organization_by_name(&self, name: &str) -> RiskGovResult<Option<Organization>>;
    /// Every organization with per-tenant counts, ordered by name.
    fn list_organizations_admin(&self) -> RiskGovResult<Vec<OrganizationSummary>>;
    fn set_organization_status(
        &self,
        id: &str,
        status: OrganizationStatus,
        actor: &str,
    ) -> RiskGovResult<Organization>;
    fn set_organization_industry(
        &self,
        id: &str,
        industry: Option<&str>,
        actor: &str,
    ) -> RiskGovResult<Organization>;

    // --- Structure ---
    fn create_division(&self, division: &Division, actor: &str) -> RiskGovResult<()>;
    fn get_division(&self, id: &str) -> RiskGovResult<Option<Division>>;
    fn list_divisions(&self, organization_id: &str) -> RiskGovResult<Vec<Division>>;
    fn rename_division(&self, id: &str, name: &str, actor: &str) -> RiskGovResult<Division>;
    /// Refused while the division has departments.
    fn delete_division(&self, id: &str, actor: &str) -> RiskGovResult<()>;
    fn create_department(&self, department: &Department, actor: &str) -> RiskGovResult<()>;
    fn get_department(&self, id: &str) -> RiskGovResult<Option<Department>>;
    fn list_departments(
        &self,
        organization_id: &str,
        division_id: Option<&str>,
    ) -> RiskGovResult<Vec<Department>>;
    fn delete_department(&self, id: &str, actor: &str) -> RiskGovResult<()>;

    // --- Invitations ---
    fn create_invitation(&self, invitation: &UserInvitation) -> RiskGovResult<()>;
    fn get_invitation(&self, id: &str) -> RiskGovResult<Option<UserInvitation>>;
    fn find_invitation_by_token(&self, token: &str) -> RiskGovResult<Option<UserInvitation>>;
    fn list_invitations(
        &self,
        organization_id: &str,
        status: Option<InvitationStatus>,
    ) -> RiskGovResult<Vec<UserInvitation>>;
    fn set_invitation_status(
        &self,
        id: &str,
        status: InvitationStatus,
        actor: &str,
    ) -> RiskGovResult<UserInvitation>;
    /// Mark the invitation ACCEPTED and create its PENDING_APPROVAL user in one
    /// transaction.
    fn accept_invitation(
        &self,
        invitation_id: &str,
        user: &UserProfile,
        at: DateTime<Utc>,
    ) -> RiskGovResult<UserInvitation>;
    /// Flip every PENDING invitation past its expiry to EXPIRED.
    fn expire_invitations(&self, now: DateTime<Utc>) -> RiskGovResult<usize>;

    // --- Users ---
    fn get_user(&self, id: &str) -> RiskGovResult<Option<UserProfile>>;
    fn find_user_by_email(
        &self,
        organization_id: &str,
        email: &str,
    ) -> RiskGovResult<Option<UserProfile>>;
    fn list_users(
        &self,
        organization_id: &str,
        status: Option<UserStatus>,
    ) -> RiskGovResult<Vec<UserProfile>>;
    fn set_user_status(&self, id: &str, status: UserStatus, actor: &str)
        -> RiskGovResult<UserProfile>;

    // --- Regulators ---
    fn create_regulator(&self, regulator: &Regulator, actor: &str) -> RiskGovResult<()>;
    fn get_regulator(&self, id: &str) -> RiskGovResult<Option<Regulator>>;
    fn list_regulators(&self) -> RiskGovResult<Vec<Regulator>>;
    /// Refused while any access grant is still active.
    fn delete_regulator(&self, id: &str, actor: &str) -> RiskGovResult<()>;
    fn grant_regulator_access(&self, access: &RegulatorAccess) -> RiskGovResult<()>;
    fn revoke_regulator_access(
        &self,
        regulator_id: &str,
        organization_id: &str,
        actor: &str,
    ) -> RiskGovResult<()>;
    /// All grants (active and revoked) held by a regulator.
    fn list_regulator_access(&self, regulator_id: &str) -> RiskGovResult<Vec<RegulatorAccess>>;
    /// Regulators with an active grant on the organization.
    fn list_regulators_for_organization(
        &self,
        organization_id: &str,
    ) -> RiskGovResult<Vec<Regulator>>;
}
