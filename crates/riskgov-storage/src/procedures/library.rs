//! Library generation write path.

use chrono::Utc;
use rusqlite::Connection;
use serde_json::json;

use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{AuditEntity, AuditOperation, GenerationLog, SeedItem};

use crate::audit::{AuditLogger, AuditRecord};
use crate::in_transaction;
use crate::queries::{library_ops, organization_ops};

pub fn upsert_seed_items(conn: &Connection, items: &[SeedItem]) -> RiskGovResult<usize> {
    in_transaction(conn, "upsert_seed_items", |conn| {
        for item in items {
            library_ops::upsert_seed(conn, item)?;
        }
        Ok(items.len())
    })
}

/// Upsert the matched items into their per-type tables and append the log
/// row. Either everything lands or nothing does.
pub fn apply_generation(
    conn: &Connection,
    organization_id: &str,
    items: &[SeedItem],
    log: &GenerationLog,
) -> RiskGovResult<()> {
    in_transaction(conn, "apply_generation", |conn| {
        if organization_ops::get(conn, organization_id)?.is_none() {
            return Err(RiskGovError::not_found("organization", organization_id));
        }
        let now = Utc::now();
        for item in items {
            library_ops::upsert_library_item(conn, organization_id, item, now)?;
        }
        library_ops::insert_generation_log(conn, log)?;
        AuditLogger::log(
            conn,
            AuditRecord {
                organization_id: Some(organization_id),
                entity_type: AuditEntity::Library,
                entity_id: &log.id,
                operation: AuditOperation::Generate,
                actor: &log.generated_by,
                details: json!({ "categories": log.categories, "counts": log.counts }),
            },
        )?;
        Ok(())
    })
}
