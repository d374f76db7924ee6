//! Divisions and departments of an organization.

use std::sync::Arc;

use chrono::Utc;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{Capability, Department, Division, SessionContext};
use riskgov_core::traits::IAdminStorage;
use riskgov_observability::events;

use crate::clean_name;

pub struct StructureService {
    store: Arc<dyn IAdminStorage>,
}

impl StructureService {
    pub fn new(store: Arc<dyn IAdminStorage>) -> Self {
        Self { store }
    }

    pub fn create_division(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        name: &str,
    ) -> RiskGovResult<Division> {
        ctx.require_in(Capability::ManageStructure, organization_id)?;
        let division = Division {
            id: riskgov_core::new_id(),
            organization_id: organization_id.to_string(),
            name: clean_name("name", name)?,
            created_at: Utc::now(),
        };
        self.store.create_division(&division, &ctx.user_id)?;
        events::admin_change("division", &division.id, "create", &ctx.user_id);
        Ok(division)
    }

    pub fn list_divisions(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<Vec<Division>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.store.list_divisions(organization_id)
    }

    pub fn rename_division(
        &self,
        ctx: &SessionContext,
        id: &str,
        name: &str,
    ) -> RiskGovResult<Division> {
        let current = self.division(id)?;
        ctx.require_in(Capability::ManageStructure, &current.organization_id)?;
        let renamed = self
            .store
            .rename_division(id, &clean_name("name", name)?, &ctx.user_id)?;
        events::admin_change("division", id, "rename", &ctx.user_id);
        Ok(renamed)
    }

    /// Refused while the division still has departments.
    pub fn delete_division(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        let current = self.division(id)?;
        ctx.require_in(Capability::ManageStructure, &current.organization_id)?;
        self.store.delete_division(id, &ctx.user_id)?;
        events::admin_change("division", id, "delete", &ctx.user_id);
        Ok(())
    }

    pub fn create_department(
        &self,
        ctx: &SessionContext,
        division_id: &str,
        name: &str,
    ) -> RiskGovResult<Department> {
        let division = self.division(division_id)?;
        ctx.require_in(Capability::ManageStructure, &division.organization_id)?;
        let department = Department {
            id: riskgov_core::new_id(),
            organization_id: division.organization_id,
            division_id: division_id.to_string(),
            name: clean_name("name", name)?,
            created_at: Utc::now(),
        };
        self.store.create_department(&department, &ctx.user_id)?;
        events::admin_change("department", &department.id, "create", &ctx.user_id);
        Ok(department)
    }

    /// All departments, or only those of `division_id`.
    pub fn list_departments(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        division_id: Option<&str>,
    ) -> RiskGovResult<Vec<Department>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.store.list_departments(organization_id, division_id)
    }

    pub fn delete_department(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        let current = self
            .store
            .get_department(id)?
            .ok_or_else(|| RiskGovError::not_found("department", id))?;
        ctx.require_in(Capability::ManageStructure, &current.organization_id)?;
        self.store.delete_department(id, &ctx.user_id)?;
        events::admin_change("department", id, "delete", &ctx.user_id);
        Ok(())
    }

    fn division(&self, id: &str) -> RiskGovResult<Division> {
        self.store
            .get_division(id)?
            .ok_or_else(|| RiskGovError::not_found("division", id))
    }
}
