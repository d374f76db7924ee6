//! Platform-level tenant management.

use std::sync::Arc;

use chrono::Utc;
use riskgov_core::errors::{AdminError, RiskGovError, RiskGovResult};
use riskgov_core::models::{
    Capability, Organization, OrganizationStatus, OrganizationSummary, Role, SessionContext,
};
use riskgov_core::traits::IAdminStorage;
use riskgov_observability::events;

use crate::clean_name;

pub struct OrganizationService {
    store: Arc<dyn IAdminStorage>,
}

impl OrganizationService {
    pub fn new(store: Arc<dyn IAdminStorage>) -> Self {
        Self { store }
    }

    /// Super admin only. Names are unique ignoring case.
    pub fn create_organization(
        &self,
        ctx: &SessionContext,
        name: &str,
        industry: Option<&str>,
    ) -> RiskGovResult<Organization> {
        ctx.require(Capability::ManageOrganizations)?;
        let name = clean_name("name", name)?;
        if self.store.find_organization_by_name(&name)?.is_some() {
            return Err(AdminError::DuplicateName {
                entity: "organization",
                name,
            }
            .into());
        }
        let org = Organization {
            id: riskgov_core::new_id(),
            name,
            industry: clean_industry(industry),
            status: OrganizationStatus::Active,
            created_at: Utc::now(),
        };
        self.store.create_organization(&org, &ctx.user_id)?;
        events::admin_change("organization", &org.id, "create", &ctx.user_id);
        Ok(org)
    }

    pub fn get_organization(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<Organization> {
        if !ctx.can_access_organization(id) {
            return Err(ctx.denied("view organization"));
        }
        self.store
            .get_organization(id)?
            .ok_or_else(|| RiskGovError::not_found("organization", id))
    }

    /// Every tenant with its counts, ordered by name.
    pub fn list_organizations_admin(
        &self,
        ctx: &SessionContext,
    ) -> RiskGovResult<Vec<OrganizationSummary>> {
        ctx.require(Capability::ManageOrganizations)?;
        let summaries = self.store.list_organizations_admin()?;
        tracing::debug!(count = summaries.len(), "listed organizations");
        Ok(summaries)
    }

    pub fn suspend(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<Organization> {
        self.set_status(ctx, id, OrganizationStatus::Suspended)
    }

    pub fn reactivate(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<Organization> {
        self.set_status(ctx, id, OrganizationStatus::Active)
    }

    /// Super admins, or the primary admin of the organization itself.
    pub fn set_industry(
        &self,
        ctx: &SessionContext,
        id: &str,
        industry: Option<&str>,
    ) -> RiskGovResult<Organization> {
        let own_primary = ctx.role == Role::PrimaryAdmin && ctx.organization_id == id;
        if !(ctx.can(Capability::ManageOrganizations) || own_primary) {
            return Err(ctx.denied("set organization industry"));
        }
        let industry = clean_industry(industry);
        let updated = self
            .store
            .set_organization_industry(id, industry.as_deref(), &ctx.user_id)?;
        events::admin_change("organization", id, "set_industry", &ctx.user_id);
        Ok(updated)
    }

    fn set_status(
        &self,
        ctx: &SessionContext,
        id: &str,
        status: OrganizationStatus,
    ) -> RiskGovResult<Organization> {
        ctx.require(Capability::ManageOrganizations)?;
        let updated = self.store.set_organization_status(id, status, &ctx.user_id)?;
        events::admin_change("organization", id, status.as_str(), &ctx.user_id);
        Ok(updated)
    }
}

fn clean_industry(industry: Option<&str>) -> Option<String> {
    industry
        .map(|i| i.trim().to_lowercase())
        .filter(|i| !i.is_empty())
}
