use std::sync::Arc;

use riskgov_core::errors::{GovernanceError, RiskGovError, RiskGovResult};
use riskgov_core::models::{Capability, ChainValidationResult, SessionContext};
use riskgov_core::traits::IChainSource;
use riskgov_observability::events;

use super::evaluate::{evaluate_chain, ChainInputs};

/// Read-only validator over an [`IChainSource`].
///
/// Any fetch failure becomes `ChainValidationUnavailable`; a broken source
/// never yields a valid result.
pub struct ChainValidator {
    source: Arc<dyn IChainSource>,
}

impl ChainValidator {
    pub fn new(source: Arc<dyn IChainSource>) -> Self {
        Self { source }
    }

    /// Validate on behalf of `ctx`.
    pub fn validate_for(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<ChainValidationResult> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.validate(organization_id)
    }

    pub fn validate(&self, organization_id: &str) -> RiskGovResult<ChainValidationResult> {
        let unavailable = |stage: &str, err: RiskGovError| -> RiskGovError {
            tracing::warn!(organization_id, stage, error = %err, "chain input fetch failed");
            GovernanceError::ChainValidationUnavailable {
                organization_id: organization_id.to_string(),
                reason: format!("{stage}: {err}"),
            }
            .into()
        };

        let taxonomy = self
            .source
            .risk_categories(organization_id)
            .map_err(|e| unavailable("risk categories", e))?;
        let statement = self
            .source
            .active_statement(organization_id)
            .map_err(|e| unavailable("active statement", e))?;
        let appetite = match &statement {
            Some(s) => self
                .source
                .appetite_categories(&s.id)
                .map_err(|e| unavailable("appetite categories", e))?,
            None => Vec::new(),
        };
        let metrics = self
            .source
            .tolerance_metrics(organization_id)
            .map_err(|e| unavailable("tolerance metrics", e))?;

        let result = evaluate_chain(ChainInputs {
            taxonomy: &taxonomy,
            statement: statement.as_ref(),
            appetite: &appetite,
            metrics: &metrics,
        });
        events::chain_validated(
            organization_id,
            result.checked_categories,
            result.gaps.len(),
            result.critical_gaps().count(),
        );
        Ok(result)
    }
}
