use std::sync::Arc;

use riskgov_core::constants::MAX_STATEMENT_TEXT_LEN;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, Capability, DeleteCheck,
    NewAppetiteCategory, SessionContext,
};
use riskgov_core::traits::IAppetiteStorage;

use crate::outcome::note_rejection;
use crate::validate;

const ENTITY: &str = "appetite_category";

/// Appetite entries of a statement. They lock with their parent.
pub struct CategoryService {
    store: Arc<dyn IAppetiteStorage>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn IAppetiteStorage>) -> Self {
        Self { store }
    }

    pub fn create_category(
        &self,
        ctx: &SessionContext,
        statement_id: &str,
        category_name: &str,
        appetite_level: AppetiteLevel,
        rationale: &str,
    ) -> RiskGovResult<AppetiteCategory> {
        let parent = self.statement(statement_id)?;
        ctx.require_in(Capability::EditAppetite, &parent.organization_id)?;
        let input = NewAppetiteCategory {
            statement_id: statement_id.to_string(),
            category_name: validate::name("category_name", category_name)?,
            appetite_level,
            rationale: rationale.trim().to_string(),
        };
        let created = self
            .store
            .create_category(&input, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, statement_id, "create", e))?;
        tracing::info!(
            category_id = %created.id,
            statement_id,
            level = %created.appetite_level,
            "appetite category created"
        );
        Ok(created)
    }

    pub fn list_categories(
        &self,
        ctx: &SessionContext,
        statement_id: &str,
    ) -> RiskGovResult<Vec<AppetiteCategory>> {
        let parent = self.statement(statement_id)?;
        ctx.require_in(Capability::ViewGovernance, &parent.organization_id)?;
        self.store.list_categories(statement_id)
    }

    /// Level and rationale, while the parent is DRAFT.
    pub fn update_category(
        &self,
        ctx: &SessionContext,
        id: &str,
        appetite_level: AppetiteLevel,
        rationale: &str,
    ) -> RiskGovResult<AppetiteCategory> {
        let (_, parent) = self.category_with_parent(id)?;
        ctx.require_in(Capability::EditAppetite, &parent.organization_id)?;
        if rationale.chars().count() > MAX_STATEMENT_TEXT_LEN {
            return Err(RiskGovError::validation("rationale", "too long"));
        }
        self.store
            .update_category(id, appetite_level, rationale.trim(), &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "update", e))
    }

    pub fn can_delete_category(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<DeleteCheck> {
        let (_, parent) = self.category_with_parent(id)?;
        ctx.require_in(Capability::ViewGovernance, &parent.organization_id)?;
        self.store.can_delete_appetite_category(id)
    }

    /// Refused with the exact reason `can_delete_category` gives.
    pub fn delete_category(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        let (category, parent) = self.category_with_parent(id)?;
        ctx.require_in(Capability::EditAppetite, &parent.organization_id)?;
        self.store
            .delete_category(id, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "delete", e))?;
        tracing::info!(category_id = id, name = %category.category_name, "appetite category deleted");
        Ok(())
    }

    fn statement(&self, id: &str) -> RiskGovResult<AppetiteStatement> {
        self.store
            .get_statement(id)?
            .ok_or_else(|| RiskGovError::not_found("appetite statement", id))
    }

    fn category_with_parent(&self, id: &str) -> RiskGovResult<(AppetiteCategory, AppetiteStatement)> {
        let category = self
            .store
            .get_category(id)?
            .ok_or_else(|| RiskGovError::not_found("appetite category", id))?;
        let parent = self.statement(&category.statement_id)?;
        Ok((category, parent))
    }
}
