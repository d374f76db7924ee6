//! Organization risk taxonomy.

use std::sync::Arc;

use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{Capability, NewRiskCategory, RiskCategory, SessionContext};
use riskgov_core::traits::ITaxonomyStorage;
use riskgov_observability::events;

use crate::clean_name;

pub struct TaxonomyService {
    store: Arc<dyn ITaxonomyStorage>,
}

impl TaxonomyService {
    pub fn new(store: Arc<dyn ITaxonomyStorage>) -> Self {
        Self { store }
    }

    pub fn create_category(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        name: &str,
        parent_id: Option<&str>,
        description: &str,
    ) -> RiskGovResult<RiskCategory> {
        ctx.require_in(Capability::ManageTaxonomy, organization_id)?;
        let input = NewRiskCategory {
            organization_id: organization_id.to_string(),
            name: clean_name("name", name)?,
            parent_id: parent_id.map(str::to_string),
            description: description.trim().to_string(),
        };
        let created = self.store.create_risk_category(&input, &ctx.user_id)?;
        events::admin_change("risk_category", &created.id, "create", &ctx.user_id);
        Ok(created)
    }

    pub fn list_categories(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<Vec<RiskCategory>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.store.list_risk_categories(organization_id)
    }

    pub fn rename_category(
        &self,
        ctx: &SessionContext,
        id: &str,
        name: &str,
    ) -> RiskGovResult<RiskCategory> {
        let current = self.category(id)?;
        ctx.require_in(Capability::ManageTaxonomy, &current.organization_id)?;
        let renamed = self
            .store
            .rename_risk_category(id, &clean_name("name", name)?, &ctx.user_id)?;
        events::admin_change("risk_category", id, "rename", &ctx.user_id);
        Ok(renamed)
    }

    /// Refused while sub-categories remain.
    pub fn delete_category(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        let current = self.category(id)?;
        ctx.require_in(Capability::ManageTaxonomy, &current.organization_id)?;
        self.store.delete_risk_category(id, &ctx.user_id)?;
        events::admin_change("risk_category", id, "delete", &ctx.user_id);
        Ok(())
    }

    fn category(&self, id: &str) -> RiskGovResult<RiskCategory> {
        self.store
            .get_risk_category(id)?
            .ok_or_else(|| RiskGovError::not_found("risk category", id))
    }
}
