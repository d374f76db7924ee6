//! Tolerance-metric procedures.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde_json::json;

use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::lifecycle;
use riskgov_core::models::{
    AuditEntity, AuditOperation, DeleteCheck, MetricSupersession, NewToleranceMetric,
    ToleranceMetric, ToleranceMetricEdit,
};

use super::{concurrent, enforce_delete};
use crate::audit::{AuditLogger, AuditRecord};
use crate::in_transaction;
use crate::queries::{category_ops, metric_ops, statement_ops};

fn load_metric(conn: &Connection, id: &str) -> RiskGovResult<ToleranceMetric> {
    metric_ops::get_metric(conn, id)?.ok_or_else(|| RiskGovError::not_found("tolerance metric", id))
}

/// The metric's appetite category must exist and belong to a statement of the
/// same organization.
fn check_category(conn: &Connection, organization_id: &str, appetite_category_id: &str) -> RiskGovResult<()> {
    let category = category_ops::get_category(conn, appetite_category_id)?
        .ok_or_else(|| RiskGovError::not_found("appetite category", appetite_category_id))?;
    let statement = statement_ops::get_statement(conn, &category.statement_id)?
        .ok_or_else(|| RiskGovError::not_found("appetite statement", &category.statement_id))?;
    if statement.organization_id != organization_id {
        return Err(RiskGovError::validation(
            "appetite_category_id",
            "category belongs to another organization",
        ));
    }
    Ok(())
}

fn log_metric(
    conn: &Connection,
    metric: &ToleranceMetric,
    operation: AuditOperation,
    actor: &str,
    details: serde_json::Value,
) -> RiskGovResult<i64> {
    AuditLogger::log(
        conn,
        AuditRecord {
            organization_id: Some(&metric.organization_id),
            entity_type: AuditEntity::ToleranceMetric,
            entity_id: &metric.id,
            operation,
            actor,
            details,
        },
    )
}

pub fn create_metric(
    conn: &Connection,
    input: &NewToleranceMetric,
    actor: &str,
) -> RiskGovResult<ToleranceMetric> {
    in_transaction(conn, "create_metric", |conn| {
        check_category(conn, &input.organization_id, &input.appetite_category_id)?;
        let metric = ToleranceMetric {
            id: riskgov_core::new_id(),
            organization_id: input.organization_id.clone(),
            appetite_category_id: input.appetite_category_id.clone(),
            name: input.name.trim().to_string(),
            description: input.description.clone(),
            metric_type: input.metric_type,
            unit: input.unit.clone(),
            materiality_type: input.materiality_type,
            thresholds: input.thresholds,
            kri_id: input.kri_id.clone(),
            is_active: false,
            never_activated: true,
            version: 1,
            previous_version_id: None,
            effective_from: input.effective_from,
            effective_to: None,
            activated_by: None,
            activated_at: None,
            created_at: Utc::now(),
            row_version: 0,
        };
        metric_ops::insert_metric(conn, &metric)?;
        log_metric(
            conn,
            &metric,
            AuditOperation::Create,
            actor,
            json!({ "name": metric.name, "metric_type": metric.metric_type.as_str() }),
        )?;
        Ok(metric)
    })
}

pub fn update_metric(
    conn: &Connection,
    id: &str,
    edit: &ToleranceMetricEdit,
    expected_row_version: i64,
    actor: &str,
) -> RiskGovResult<ToleranceMetric> {
    in_transaction(conn, "update_metric", |conn| {
        let current = load_metric(conn, id)?;
        lifecycle::ensure_metric_editable(&current)?;
        if !metric_ops::update_definition(conn, id, edit, expected_row_version)? {
            return Err(concurrent("tolerance metric", id, expected_row_version));
        }
        log_metric(
            conn,
            &current,
            AuditOperation::Update,
            actor,
            json!({ "thresholds": edit.thresholds }),
        )?;
        load_metric(conn, id)
    })
}

pub fn activate_metric(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<ToleranceMetric> {
    in_transaction(conn, "activate_metric", |conn| {
        let current = load_metric(conn, id)?;
        lifecycle::ensure_can_activate(&current)?;
        if !metric_ops::mark_active(conn, id, actor, Utc::now(), current.row_version)? {
            return Err(concurrent("tolerance metric", id, current.row_version));
        }
        log_metric(
            conn,
            &current,
            AuditOperation::Activate,
            actor,
            json!({ "kri_id": current.kri_id }),
        )?;
        load_metric(conn, id)
    })
}

pub fn deactivate_metric(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<ToleranceMetric> {
    in_transaction(conn, "deactivate_metric", |conn| {
        let current = load_metric(conn, id)?;
        lifecycle::ensure_can_deactivate(&current)?;
        let today = Utc::now().date_naive();
        if !metric_ops::mark_inactive(conn, id, today, current.row_version)? {
            return Err(concurrent("tolerance metric", id, current.row_version));
        }
        log_metric(
            conn,
            &current,
            AuditOperation::Deactivate,
            actor,
            json!({ "effective_to": today.to_string() }),
        )?;
        load_metric(conn, id)
    })
}

/// Deactivate the active version and insert its inactive successor carrying
/// the same thresholds, in one transaction.
pub fn supersede_metric(
    conn: &Connection,
    id: &str,
    new_effective_from: NaiveDate,
    actor: &str,
) -> RiskGovResult<MetricSupersession> {
    in_transaction(conn, "supersede_metric", |conn| {
        let current = load_metric(conn, id)?;
        lifecycle::ensure_can_supersede_metric(&current, new_effective_from)?;

        let now = Utc::now();
        let successor =
            lifecycle::successor_metric(&current, riskgov_core::new_id(), new_effective_from, now);
        if !metric_ops::mark_inactive(conn, id, now.date_naive(), current.row_version)? {
            return Err(concurrent("tolerance metric", id, current.row_version));
        }
        metric_ops::insert_metric(conn, &successor)?;

        log_metric(
            conn,
            &current,
            AuditOperation::Supersede,
            actor,
            json!({ "successor_id": successor.id }),
        )?;
        log_metric(
            conn,
            &successor,
            AuditOperation::Create,
            actor,
            json!({ "version": successor.version, "previous_version_id": id }),
        )?;

        Ok(MetricSupersession {
            superseded: load_metric(conn, id)?,
            successor: load_metric(conn, &successor.id)?,
        })
    })
}

pub fn can_delete_metric(conn: &Connection, id: &str) -> RiskGovResult<DeleteCheck> {
    Ok(lifecycle::metric_delete_check(&load_metric(conn, id)?))
}

pub fn delete_metric(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_metric", |conn| {
        let current = load_metric(conn, id)?;
        enforce_delete(lifecycle::metric_delete_check(&current), "tolerance metric", id)?;
        metric_ops::delete_metric(conn, id)?;
        log_metric(
            conn,
            &current,
            AuditOperation::Delete,
            actor,
            json!({ "name": current.name }),
        )?;
        Ok(())
    })
}

/// Version chain ending at `id`, oldest first.
pub fn metric_history(conn: &Connection, id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
    let mut chain = vec![load_metric(conn, id)?];
    while let Some(previous_id) = chain.last().and_then(|m| m.previous_version_id.clone()) {
        match metric_ops::get_metric(conn, &previous_id)? {
            Some(previous) => chain.push(previous),
            None => break,
        }
    }
    chain.reverse();
    Ok(chain)
}
