//! Risk taxonomy procedures.

use chrono::Utc;
use rusqlite::Connection;
use serde_json::json;

use riskgov_core::errors::{AdminError, RiskGovError, RiskGovResult};
use riskgov_core::models::{AuditEntity, AuditOperation, NewRiskCategory, RiskCategory};

use crate::audit::{AuditLogger, AuditRecord};
use crate::in_transaction;
use crate::queries::{organization_ops, taxonomy_ops};

fn load(conn: &Connection, id: &str) -> RiskGovResult<RiskCategory> {
    taxonomy_ops::get(conn, id)?.ok_or_else(|| RiskGovError::not_found("risk category", id))
}

pub fn create(conn: &Connection, input: &NewRiskCategory, actor: &str) -> RiskGovResult<RiskCategory> {
    in_transaction(conn, "create_risk_category", |conn| {
        if organization_ops::get(conn, &input.organization_id)?.is_none() {
            return Err(RiskGovError::not_found("organization", &input.organization_id));
        }
        if let Some(parent_id) = &input.parent_id {
            let parent = load(conn, parent_id)?;
            if parent.organization_id != input.organization_id {
                return Err(RiskGovError::validation(
                    "parent_id",
                    "parent category belongs to another organization",
                ));
            }
        }
        let category = RiskCategory {
            id: riskgov_core::new_id(),
            organization_id: input.organization_id.clone(),
            name: input.name.trim().to_string(),
            parent_id: input.parent_id.clone(),
            description: input.description.clone(),
            created_at: Utc::now(),
        };
        taxonomy_ops::insert(conn, &category)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&category.organization_id),
                entity_type: AuditEntity::RiskCategory,
                entity_id: &category.id,
                operation: AuditOperation::Create,
                actor,
                details: json!({ "name": category.name, "parent_id": category.parent_id }),
            },
        )?;
        Ok(category)
    })
}

pub fn rename(conn: &Connection, id: &str, name: &str, actor: &str) -> RiskGovResult<RiskCategory> {
    in_transaction(conn, "rename_risk_category", |conn| {
        let current = load(conn, id)?;
        taxonomy_ops::rename(conn, id, name.trim())?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&current.organization_id),
                entity_type: AuditEntity::RiskCategory,
                entity_id: id,
                operation: AuditOperation::Update,
                actor,
                details: json!({ "from": current.name, "to": name.trim() }),
            },
        )?;
        load(conn, id)
    })
}

pub fn delete(conn: &Connection, id: &str, actor: &str) -> RiskGovResult<()> {
    in_transaction(conn, "delete_risk_category", |conn| {
        let current = load(conn, id)?;
        let children = taxonomy_ops::count_children(conn, id)?;
        if children > 0 {
            return Err(AdminError::InUse {
                entity: "risk category",
                id: id.to_string(),
                reason: format!("{children} sub-categories"),
            }
            .into());
        }
        taxonomy_ops::delete(conn, id)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(&current.organization_id),
                entity_type: AuditEntity::RiskCategory,
                entity_id: id,
                operation: AuditOperation::Delete,
                actor,
                details: json!({ "name": current.name }),
            },
        )?;
        Ok(())
    })
}
