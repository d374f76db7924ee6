//! Regulators and their per-organization read access.

use std::sync::Arc;

use chrono::Utc;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{Capability, Regulator, RegulatorAccess, Role, SessionContext};
use riskgov_core::traits::IAdminStorage;
use riskgov_observability::events;

use crate::clean_name;
use crate::email::normalize_email;

pub struct RegulatorService {
    store: Arc<dyn IAdminStorage>,
}

impl RegulatorService {
    pub fn new(store: Arc<dyn IAdminStorage>) -> Self {
        Self { store }
    }

    pub fn create_regulator(
        &self,
        ctx: &SessionContext,
        name: &str,
        jurisdiction: &str,
        contact_email: &str,
    ) -> RiskGovResult<Regulator> {
        ctx.require(Capability::ManageRegulators)?;
        let regulator = Regulator {
            id: riskgov_core::new_id(),
            name: clean_name("name", name)?,
            jurisdiction: clean_name("jurisdiction", jurisdiction)?,
            contact_email: normalize_email(contact_email)?,
            created_at: Utc::now(),
        };
        self.store.create_regulator(&regulator, &ctx.user_id)?;
        events::admin_change("regulator", &regulator.id, "create", &ctx.user_id);
        Ok(regulator)
    }

    pub fn list_regulators(&self, ctx: &SessionContext) -> RiskGovResult<Vec<Regulator>> {
        ctx.require(Capability::ManageRegulators)?;
        self.store.list_regulators()
    }

    /// Refused while any grant is active.
    pub fn delete_regulator(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        ctx.require(Capability::ManageRegulators)?;
        self.store.delete_regulator(id, &ctx.user_id)?;
        events::admin_change("regulator", id, "delete", &ctx.user_id);
        Ok(())
    }

    /// Primary admin of the organization, or a super admin.
    pub fn grant_access(
        &self,
        ctx: &SessionContext,
        regulator_id: &str,
        organization_id: &str,
    ) -> RiskGovResult<RegulatorAccess> {
        ctx.require_in(Capability::GrantRegulatorAccess, organization_id)?;
        self.regulator(regulator_id)?;
        if self.store.get_organization(organization_id)?.is_none() {
            return Err(RiskGovError::not_found("organization", organization_id));
        }
        let access = RegulatorAccess {
            regulator_id: regulator_id.to_string(),
            organization_id: organization_id.to_string(),
            granted_by: ctx.user_id.clone(),
            granted_at: Utc::now(),
            revoked_at: None,
        };
        self.store.grant_regulator_access(&access)?;
        events::admin_change("regulator_access", regulator_id, "grant", &ctx.user_id);
        Ok(access)
    }

    pub fn revoke_access(
        &self,
        ctx: &SessionContext,
        regulator_id: &str,
        organization_id: &str,
    ) -> RiskGovResult<()> {
        ctx.require_in(Capability::GrantRegulatorAccess, organization_id)?;
        self.store
            .revoke_regulator_access(regulator_id, organization_id, &ctx.user_id)?;
        events::admin_change("regulator_access", regulator_id, "revoke", &ctx.user_id);
        Ok(())
    }

    /// Regulators currently allowed to view the organization.
    pub fn regulators_for_organization(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<Vec<Regulator>> {
        ctx.require_in(Capability::GrantRegulatorAccess, organization_id)?;
        self.store.list_regulators_for_organization(organization_id)
    }

    /// Organizations the regulator may view. Regulators may only ask about
    /// themselves.
    pub fn organizations_for_regulator(
        &self,
        ctx: &SessionContext,
        regulator_id: &str,
    ) -> RiskGovResult<Vec<String>> {
        let is_self = ctx.role == Role::Regulator && ctx.organization_id == regulator_id;
        if !(ctx.can(Capability::ManageRegulators) || is_self) {
            return Err(ctx.denied("list regulator organizations"));
        }
        Ok(self
            .store
            .list_regulator_access(regulator_id)?
            .into_iter()
            .filter(RegulatorAccess::is_active)
            .map(|a| a.organization_id)
            .collect())
    }

    /// Narrow a regulator session to one granted organization. The returned
    /// context passes the tenant checks of every other service.
    pub fn scoped_session(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<SessionContext> {
        if ctx.role != Role::Regulator {
            return Err(ctx.denied("open a regulator session"));
        }
        let granted = self
            .store
            .list_regulator_access(&ctx.organization_id)?
            .iter()
            .any(|a| a.is_active() && a.organization_id == organization_id);
        if !granted {
            events::permission_denied(&ctx.user_id, ctx.role.as_str(), "view organization");
            return Err(ctx.denied(&format!("view organization {organization_id}")));
        }
        Ok(SessionContext::new(
            ctx.user_id.clone(),
            organization_id,
            Role::Regulator,
        ))
    }

    fn regulator(&self, id: &str) -> RiskGovResult<Regulator> {
        self.store
            .get_regulator(id)?
            .ok_or_else(|| RiskGovError::not_found("regulator", id))
    }
}
