use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{GovernanceError, RiskGovError, RiskGovResult};
use crate::models::{DeleteCheck, MetricLifecycle, ToleranceMetric};

/// Hard delete is reserved for metrics that never entered the decision trail.
pub fn metric_delete_check(metric: &ToleranceMetric) -> DeleteCheck {
    match metric.lifecycle() {
        MetricLifecycle::Inactive => DeleteCheck::allow(),
        MetricLifecycle::Active => {
            DeleteCheck::deny("metric is active; deactivate or supersede it instead")
        }
        MetricLifecycle::Historical => {
            DeleteCheck::deny("metric has been activated and is retained for audit")
        }
    }
}

/// Only never-activated metrics are edited in place.
pub fn ensure_metric_editable(metric: &ToleranceMetric) -> RiskGovResult<()> {
    match metric.lifecycle() {
        MetricLifecycle::Inactive => Ok(()),
        MetricLifecycle::Active => Err(GovernanceError::violation(format!(
            "metric {} is active; supersede it to change thresholds",
            metric.id
        ))
        .into()),
        MetricLifecycle::Historical => Err(GovernanceError::violation(format!(
            "metric {} is historical and immutable",
            metric.id
        ))
        .into()),
    }
}

/// Inactive → Active. The KRI link is checked first.
pub fn ensure_can_activate(metric: &ToleranceMetric) -> RiskGovResult<()> {
    let has_kri = metric
        .kri_id
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !has_kri {
        return Err(GovernanceError::MissingKriLink {
            metric_id: metric.id.clone(),
        }
        .into());
    }
    match metric.lifecycle() {
        MetricLifecycle::Inactive => Ok(()),
        MetricLifecycle::Active => Err(GovernanceError::violation(format!(
            "metric {} is already active",
            metric.id
        ))
        .into()),
        MetricLifecycle::Historical => Err(GovernanceError::violation(format!(
            "metric {} was closed; supersede history is not reopened",
            metric.id
        ))
        .into()),
    }
}

/// Active → Historical.
pub fn ensure_can_deactivate(metric: &ToleranceMetric) -> RiskGovResult<()> {
    if metric.lifecycle() != MetricLifecycle::Active {
        return Err(GovernanceError::violation(format!(
            "metric {} is not active",
            metric.id
        ))
        .into());
    }
    Ok(())
}

pub fn ensure_can_supersede_metric(
    metric: &ToleranceMetric,
    new_effective_from: NaiveDate,
) -> RiskGovResult<()> {
    if metric.lifecycle() != MetricLifecycle::Active {
        return Err(GovernanceError::violation(format!(
            "only active metrics can be superseded; metric {} is {:?}",
            metric.id,
            metric.lifecycle()
        ))
        .into());
    }
    if new_effective_from < metric.effective_from {
        return Err(RiskGovError::validation(
            "new_effective_from",
            format!(
                "must not precede the current effective date {}",
                metric.effective_from
            ),
        ));
    }
    Ok(())
}

/// Build the inactive next version of `metric`, carrying its thresholds.
pub fn successor_metric(
    metric: &ToleranceMetric,
    new_id: String,
    new_effective_from: NaiveDate,
    now: DateTime<Utc>,
) -> ToleranceMetric {
    ToleranceMetric {
        id: new_id,
        organization_id: metric.organization_id.clone(),
        appetite_category_id: metric.appetite_category_id.clone(),
        name: metric.name.clone(),
        description: metric.description.clone(),
        metric_type: metric.metric_type,
        unit: metric.unit.clone(),
        materiality_type: metric.materiality_type,
        thresholds: metric.thresholds,
        kri_id: metric.kri_id.clone(),
        is_active: false,
        never_activated: true,
        version: metric.version + 1,
        previous_version_id: Some(metric.id.clone()),
        effective_from: new_effective_from,
        effective_to: None,
        activated_by: None,
        activated_at: None,
        created_at: now,
        row_version: 0,
    }
}
