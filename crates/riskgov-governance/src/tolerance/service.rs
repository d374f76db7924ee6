use std::sync::Arc;

use chrono::NaiveDate;
use riskgov_core::constants::MAX_STATEMENT_TEXT_LEN;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{
    Capability, DeleteCheck, MetricSupersession, NewToleranceMetric, SessionContext,
    ToleranceMetric, ToleranceMetricEdit, ToleranceStatus,
};
use riskgov_core::traits::IToleranceStorage;
use riskgov_observability::events;

use crate::outcome::note_rejection;
use crate::validate;

const ENTITY: &str = "tolerance_metric";

/// Tolerance metric lifecycle: Inactive → Active → Historical.
pub struct ToleranceService {
    store: Arc<dyn IToleranceStorage>,
}

impl ToleranceService {
    pub fn new(store: Arc<dyn IToleranceStorage>) -> Self {
        Self { store }
    }

    /// New metrics always start inactive and never activated.
    pub fn create_metric(
        &self,
        ctx: &SessionContext,
        input: &NewToleranceMetric,
    ) -> RiskGovResult<ToleranceMetric> {
        ctx.require_in(Capability::ManageTolerance, &input.organization_id)?;
        input.thresholds.validate(input.metric_type)?;
        let cleaned = NewToleranceMetric {
            name: validate::name("name", &input.name)?,
            description: bounded("description", &input.description)?,
            unit: input.unit.trim().to_string(),
            kri_id: clean_kri(input.kri_id.as_deref()),
            ..input.clone()
        };
        let created = self
            .store
            .create_metric(&cleaned, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, &input.appetite_category_id, "create", e))?;
        tracing::info!(
            metric_id = %created.id,
            metric_type = %created.metric_type,
            category = %created.appetite_category_id,
            "tolerance metric created"
        );
        Ok(created)
    }

    pub fn get_metric(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<ToleranceMetric> {
        let metric = self.load(id)?;
        ctx.require_in(Capability::ViewGovernance, &metric.organization_id)?;
        Ok(metric)
    }

    pub fn list_metrics(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<Vec<ToleranceMetric>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        let metrics = self.store.list_metrics(organization_id)?;
        tracing::debug!(organization_id, count = metrics.len(), "listed tolerance metrics");
        Ok(metrics)
    }

    /// Every version leading up to `id`, oldest first.
    pub fn metric_history(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
        let metric = self.load(id)?;
        ctx.require_in(Capability::ViewGovernance, &metric.organization_id)?;
        self.store.metric_history(id)
    }

    /// Edit a never-activated metric in place.
    pub fn update_metric(
        &self,
        ctx: &SessionContext,
        id: &str,
        edit: &ToleranceMetricEdit,
        expected_row_version: i64,
    ) -> RiskGovResult<ToleranceMetric> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ManageTolerance, &current.organization_id)?;
        edit.thresholds.validate(edit.metric_type)?;
        let cleaned = ToleranceMetricEdit {
            name: validate::name("name", &edit.name)?,
            description: bounded("description", &edit.description)?,
            unit: edit.unit.trim().to_string(),
            kri_id: clean_kri(edit.kri_id.as_deref()),
            ..edit.clone()
        };
        self.store
            .update_metric(id, &cleaned, expected_row_version, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "update", e))
    }

    /// Requires a linked KRI whatever the metric type.
    pub fn activate_metric(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<ToleranceMetric> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ManageTolerance, &current.organization_id)?;
        let activated = self
            .store
            .activate_metric(id, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "activate", e))?;
        events::metric_transition(&activated.id, activated.version, "ACTIVE", &ctx.user_id);
        Ok(activated)
    }

    /// Soft close. The metric stays on record as historical.
    pub fn deactivate_metric(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<ToleranceMetric> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ManageTolerance, &current.organization_id)?;
        let closed = self
            .store
            .deactivate_metric(id, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "deactivate", e))?;
        events::metric_transition(&closed.id, closed.version, "HISTORICAL", &ctx.user_id);
        Ok(closed)
    }

    pub fn supersede_metric(
        &self,
        ctx: &SessionContext,
        id: &str,
        new_effective_from: NaiveDate,
    ) -> RiskGovResult<MetricSupersession> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ManageTolerance, &current.organization_id)?;
        let outcome = self
            .store
            .supersede_metric(id, new_effective_from, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "supersede", e))?;
        events::metric_transition(
            &outcome.superseded.id,
            outcome.superseded.version,
            "HISTORICAL",
            &ctx.user_id,
        );
        events::metric_transition(
            &outcome.successor.id,
            outcome.successor.version,
            "INACTIVE",
            &ctx.user_id,
        );
        Ok(outcome)
    }

    pub fn can_delete_metric(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<DeleteCheck> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ViewGovernance, &current.organization_id)?;
        self.store.can_delete_tolerance_metric(id)
    }

    pub fn delete_metric(&self, ctx: &SessionContext, id: &str) -> RiskGovResult<()> {
        let current = self.load(id)?;
        ctx.require_in(Capability::ManageTolerance, &current.organization_id)?;
        self.store
            .delete_metric(id, &ctx.user_id)
            .inspect_err(|e| note_rejection(ENTITY, id, "delete", e))?;
        tracing::info!(metric_id = id, "tolerance metric deleted");
        Ok(())
    }

    /// Read a measured value against the stored bands. `None` for
    /// directional metrics.
    pub fn classify(
        &self,
        ctx: &SessionContext,
        id: &str,
        value: f64,
    ) -> RiskGovResult<Option<ToleranceStatus>> {
        let value = validate::finite("value", value)?;
        let metric = self.load(id)?;
        ctx.require_in(Capability::ViewGovernance, &metric.organization_id)?;
        Ok(metric.classify(value))
    }

    fn load(&self, id: &str) -> RiskGovResult<ToleranceMetric> {
        self.store
            .get_metric(id)?
            .ok_or_else(|| RiskGovError::not_found("tolerance metric", id))
    }
}

fn bounded(field: &str, value: &str) -> RiskGovResult<String> {
    if value.chars().count() > MAX_STATEMENT_TEXT_LEN {
        return Err(RiskGovError::validation(field, "too long"));
    }
    Ok(value.trim().to_string())
}

/// Blank KRI ids count as unlinked.
fn clean_kri(kri_id: Option<&str>) -> Option<String> {
    kri_id
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}
