//! Statement and appetite-category procedures.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use serde_json::json;

use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::lifecycle;
use riskgov_core::models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, AuditEntity, AuditOperation, DeleteCheck,
    NewAppetiteCategory, NewStatement, StatementStatus, StatementSupersession,
};

use super::{concurrent, enforce_delete};
use crate::audit::{AuditLogger, AuditRecord};
use crate::in_transaction;
use crate::queries::{category_ops, metric_ops, organization_ops, statement_ops};

fn load_statement(conn: &Connection, id: &str) -> RiskGovResult<AppetiteStatement> {
    statement_ops::get_statement(conn, id)?
        .ok_or_else(|| RiskGovError::not_found("appetite statement", id))
}

fn load_category(conn: &Connection, id: &str) -> RiskGovResult<AppetiteCategory> {
    category_ops::get_category(conn, id)?
        .ok_or_else(|| RiskGovError::not_found("appetite category", id))
}

/// APPROVED if present, else the newest DRAFT.
pub fn active_statement(conn: &Connection, organization_id: &str) -> RiskGovResult<Option<AppetiteStatement>> {
    match statement_ops::get_approved(conn, organization_id)? {
        Some(approved) => Ok(Some(approved)),
        None => statement_ops::get_latest_draft(conn, organization_id),
    }
}

pub fn create_statement(conn: &Connection, input: &NewStatement) -> RiskGovResult<AppetiteStatement> {
    in_transaction(conn, "create_statement", |conn| {
        if organization_ops::get(conn, &input.organization_id)?.is_none() {
            return Err(RiskGovError::not_found("organization", &input.organization_id));
        }
        let approved = statement_ops::get_approved(conn, &input.organization_id)?;
        lifecycle::ensure_can_create_statement(approved.as_ref())?;

        let statement = AppetiteStatement {
            id: riskgov_core::new_id(),
            organization_id: input.organization_id.clone(),
            version: statement_ops::next_version(conn, &input.organization_id)?,
            statement_text: input.statement_text.clone(),
            effective_from: input.effective_from,
            status: StatementStatus::Draft,
            approved_by: None,
            approved_at: None,
            superseded_by: None,
            created_by: input.created_by.clone(),
            created_at: Utc::now(),
            row_version: 0,
        };
        statement_ops::insert_statement(conn, &statement)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&statement.organization_id),
                entity_type: AuditEntity::AppetiteStatement,
                entity_id: &statement.id,
                operation: AuditOperation::Create,
                actor: &statement.created_by,
                details: json!({ "version": statement.version }),
            },
        )?;
        Ok(statement)
    })
}

pub fn update_statement(
    conn: &Connection,
    id: &str,
    statement_text: &str,
    effective_from: NaiveDate,
    expected_row_version: i64,
    actor: &str,
) -> RiskGovResult<AppetiteStatement> {
    in_transaction(conn, "update_statement", |conn| {
        let current = load_statement(conn, id)?;
        lifecycle::ensure_statement_editable(&current)?;
        if !statement_ops::update_text(conn, id, statement_text, effective_from, expected_row_version)? {
            return Err(concurrent("appetite statement", id, expected_row_version));
        }
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&current.organization_id),
                entity_type: AuditEntity::AppetiteStatement,
                entity_id: id,
                operation: AuditOperation::Update,
                actor,
                details: json!({ "effective_from": effective_from.to_string() }),
            },
        )?;
        load_statement(conn, id)
    })
}

pub fn approve_statement(
    conn: &Connection,
    id: &str,
    approver_id: &str,
    allow_self_approval: bool,
) -> RiskGovResult<AppetiteStatement> {
    in_transaction(conn, "approve_statement", |conn| {
        let statement = load_statement(conn, id)?;
        let approved = statement_ops::get_approved(conn, &statement.organization_id)?;
        lifecycle::ensure_can_approve(&statement, approver_id, approved.as_ref(), allow_self_approval)?;

        let marked =
            statement_ops::mark_approved(conn, id, approver_id, Utc::now(), statement.row_version)?;
        if !marked {
            return Err(concurrent("appetite statement", id, statement.row_version));
        }
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&statement.organization_id),
                entity_type: AuditEntity::AppetiteStatement,
                entity_id: id,
                operation: AuditOperation::Approve,
                actor: approver_id,
                details: json!({ "version": statement.version }),
            },
        )?;
        load_statement(conn, id)
    })
}

/// Close the APPROVED statement and open its DRAFT successor, moving every
/// appetite category across. All three steps commit or none do.
pub fn supersede_statement(
    conn: &Connection,
    id: &str,
    new_effective_from: NaiveDate,
    actor: &str,
) -> RiskGovResult<StatementSupersession> {
    in_transaction(conn, "supersede_statement", |conn| {
        let current = load_statement(conn, id)?;
        lifecycle::ensure_can_supersede_statement(&current, new_effective_from)?;

        let successor = AppetiteStatement {
            id: riskgov_core::new_id(),
            organization_id: current.organization_id.clone(),
            version: statement_ops::next_version(conn, &current.organization_id)?,
            statement_text: current.statement_text.clone(),
            effective_from: new_effective_from,
            status: StatementStatus::Draft,
            approved_by: None,
            approved_at: None,
            superseded_by: None,
            created_by: actor.to_string(),
            created_at: Utc::now(),
            row_version: 0,
        };

        if !statement_ops::mark_superseded(conn, id, &successor.id, current.row_version)? {
            return Err(concurrent("appetite statement", id, current.row_version));
        }
        statement_ops::insert_statement(conn, &successor)?;
        let migrated = category_ops::migrate_to_statement(conn, id, &successor.id)?;

        let org = Some(current.organization_id.as_str());
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: org,
                entity_type: AuditEntity::AppetiteStatement,
                entity_id: id,
                operation: AuditOperation::Supersede,
                actor,
                details: json!({ "superseded_by": successor.id, "version": current.version }),
            },
        )?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: org,
                entity_type: AuditEntity::AppetiteStatement,
                entity_id: &successor.id,
                operation: AuditOperation::Create,
                actor,
                details: json!({ "version": successor.version, "supersedes": id }),
            },
        )?;
        for category_id in &migrated {
            AuditLogger::log(
                conn,
                AuditRecord {
                    organization_id: org,
                    entity_type: AuditEntity::AppetiteCategory,
                    entity_id: category_id,
                    operation: AuditOperation::Migrate,
                    actor,
                    details: json!({ "from": id, "to": successor.id }),
                },
            )?;
        }

        Ok(StatementSupersession {
            superseded: load_statement(conn, id)?,
            successor: load_statement(conn, &successor.id)?,
            migrated_category_ids: migrated,
        })
    })
}

pub fn can_delete_statement(conn: &Connection, id: &str) -> RiskGovResult<DeleteCheck> {
    let statement = load_statement(conn, id)?;
    let dependents = metric_ops::count_by_statement(conn, id)?;
    Ok(lifecycle::statement_delete_check(&statement, dependents))
}

/// Hard delete of a DRAFT together with its appetite categories.
pub fn delete_statement(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_statement", |conn| {
        let statement = load_statement(conn, id)?;
        enforce_delete(can_delete_statement(conn, id)?, "appetite statement", id)?;
        let categories = category_ops::delete_by_statement(conn, id)?;
        statement_ops::delete_statement(conn, id)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&statement.organization_id),
                entity_type: AuditEntity::AppetiteStatement,
                entity_id: id,
                operation: AuditOperation::Delete,
                actor,
                details: json!({ "version": statement.version, "categories_removed": categories }),
            },
        )?;
        Ok(())
    })
}

pub fn create_category(
    conn: &Connection,
    input: &NewAppetiteCategory,
    actor: &str,
) -> RiskGovResult<AppetiteCategory> {
    in_transaction(conn, "create_category", |conn| {
        let parent = load_statement(conn, &input.statement_id)?;

        let category = AppetiteCategory {
            id: riskgov_core::new_id(),
            statement_id: input.statement_id.clone(),
            category_name: input.category_name.trim().to_string(),
            appetite_level: input.appetite_level,
            rationale: input.rationale.clone(),
            created_at: Utc::now(),
        };
        category_ops::insert_category(conn, &category)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&parent.organization_id),
                entity_type: AuditEntity::AppetiteCategory,
                entity_id: &category.id,
                operation: AuditOperation::Create,
                actor,
                details: json!({
                    "category_name": category.category_name,
                    "appetite_level": category.appetite_level.as_str(),
                }),
            },
        )?;
        Ok(category)
    })
}

pub fn update_category(
    conn: &Connection,
    id: &str,
    appetite_level: AppetiteLevel,
    rationale: &str,
    actor: &str,
) -> RiskGovResult<AppetiteCategory> {
    in_transaction(conn, "update_category", |conn| {
        let category = load_category(conn, id)?;
        let parent = load_statement(conn, &category.statement_id)?;
        lifecycle::ensure_category_editable(&parent)?;
        category_ops::update_category(conn, id, appetite_level, rationale)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&parent.organization_id),
                entity_type: AuditEntity::AppetiteCategory,
                entity_id: id,
                operation: AuditOperation::Update,
                actor,
                details: json!({
                    "from": category.appetite_level.as_str(),
                    "to": appetite_level.as_str(),
                }),
            },
        )?;
        load_category(conn, id)
    })
}

pub fn can_delete_category(conn: &Connection, id: &str) -> RiskGovResult<DeleteCheck> {
    let category = load_category(conn, id)?;
    let parent = load_statement(conn, &category.statement_id)?;
    let dependents = metric_ops::count_by_category(conn, id)?;
    Ok(lifecycle::category_delete_check(&parent, dependents))
}

pub fn delete_category(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_category", |conn| {
        let category = load_category(conn, id)?;
        let parent = load_statement(conn, &category.statement_id)?;
        enforce_delete(can_delete_category(conn, id)?, "appetite category", id)?;
        category_ops::delete_category(conn, id)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&parent.organization_id),
                entity_type: AuditEntity::AppetiteCategory,
                entity_id: id,
                operation: AuditOperation::Delete,
                actor,
                details: json!({ "category_name": category.category_name }),
            },
        )?;
        Ok(())
    })
}
