use std::sync::Arc;

use chrono::NaiveDate;
use riskgov_core::config::GovernanceConfig;
use riskgov_core::constants::MAX_STATEMENT_TEXT_LEN;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{
    AppetiteStatement, Capability, DeleteCheck, NewStatement, SessionContext,
    StatementSupersession,
};
use riskgov_core::traits::IAppetiteStorage;
use riskgov_observability::events;

use crate::outcome::note_rejection;
use crate::validate;

const ENTITY: &str = "appetite_statement";

/// Versioned risk appetite statements of an organization.
pub struct AppetiteService {
    store: Arc<dyn IAppetiteStorage>,
    config: GovernanceConfig,
}

impl AppetiteService {
    pub fn new(store: Arc<dyn IAppetiteStorage>, config: GovernanceConfig) -> Self {
        Self { store, config }
    }

    /// Open a new DRAFT version. Refused while an APPROVED statement exists.
    pub fn create_statement(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        statement_text: &str,
        effective_from: NaiveDate,
    ) -> RiskGovResult<AppetiteStatement> {
        ctx.require_in(Capability::EditAppetite, organization_id)?;
        let text = validate::required_text("statement_text", statement_text, MAX_STATEMENT_TEXT_LEN)?;
        let input = NewStatement {
            organization_id: organization_id.to_string(),
            statement_text: text.to_string(),
            effective_from,
            created_by: ctx.user_id.clone(),
        };
        let created = self
            .store
            .create_statement(&input)
            .inspect_err(|e| note_rejection(ENTITY, organization_id, "create", e))?;
        events::statement_transition(&created.id, created.version, "DRAFT", &ctx.user_id);
        Ok(created)
    }

    pub fn get_statement(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<AppetiteStatement> {
        let statement = self.load(id)?;
        ctx.require_in(Capability::ViewGovernance, &statement.organization_id)?;
        Ok(statement)
    }

    /// Newest version first.
    pub fn list_statements(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<Vec<AppetiteStatement>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        let statements = self.store.list_statements(organization_id)?;
        tracing::debug!(organization_id, count = statements.len(), "listed statements");
        Ok(statements)
    }

    /// Edit a DRAFT. `expected_row_version` is the version the caller read.
    pub fn update_statement(
        &self,
        ctx: &SessionContext,
        id: &str,
        statement_text: &str,
        effective_from: NaiveDate,
        expected_row_version: i64,
    ) -> RiskGovResult<AppetiteStatement> {
        let current = self.load(id)?;
        ctx.require_in(Capability::EditAppetite, &current.organization_id)?;
        let text = validate::required_text("statement_text", statement_text, MAX_STATEMENT_TEXT_LEN)?;
        self.store
            .update_statement(id, text, effective_from, expected_row_version, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "update", e))
    }

    /// DRAFT → APPROVED with the caller as approver.
    pub fn approve_statement(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<AppetiteStatement> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ApproveAppetite, &current.organization_id)?;
        let approved = self
            .store
            .approve_statement(id, &ctx.user_id, self.config.allow_self_approval)
            .inspect_err(|e| note_rejection(ENTITY, id, "approve", e))?;
        events::statement_transition(&approved.id, approved.version, "APPROVED", &ctx.user_id);
        Ok(approved)
    }

    /// Close an APPROVED statement and open its DRAFT successor, moving every
    /// appetite category across. All or nothing.
    pub fn supersede_statement(
        &self,
        ctx: &SessionContext,
        id: &str,
        new_effective_from: NaiveDate,
    ) -> RiskGovResult<StatementSupersession> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ApproveAppetite, &current.organization_id)?;
        let outcome = self
            .store
            .supersede_statement(id, new_effective_from, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "supersede", e))?;
        events::statement_transition(
            &outcome.superseded.id,
            outcome.superseded.version,
            "SUPERSEDED",
            &ctx.user_id,
        );
        events::statement_transition(
            &outcome.successor.id,
            outcome.successor.version,
            "DRAFT",
            &ctx.user_id,
        );
        tracing::info!(
            migrated = outcome.migrated_category_ids.len(),
            successor = %outcome.successor.id,
            "appetite categories migrated"
        );
        Ok(outcome)
    }

    pub fn can_delete_statement(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<DeleteCheck> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ViewGovernance, &current.organization_id)?;
        self.store.can_delete_statement(id)
    }

    /// Hard delete of a DRAFT together with its categories.
    pub fn delete_statement(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        let current = self.load(id)?;
        ctx.require_in(Capability::EditAppetite, &current.organization_id)?;
        self.store
            .delete_statement(id, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "delete", e))?;
        tracing::info!(statement_id = id, version = current.version, "draft statement deleted");
        Ok(())
    }

    fn load(&self, id: &str) -> RiskGovResult<AppetiteStatement> {
        self.store
            .get_statement(id)?
            .ok_or_else(|| RiskGovError::not_found("appetite statement", id))
    }
}
