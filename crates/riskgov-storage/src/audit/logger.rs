//! Log every governance and administration mutation.

use chrono::Utc;
use rusqlite::Connection;

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{AuditEntity, AuditOperation};

use crate::queries::audit_ops;

/// One mutation to record. The logger fills in timestamp and hashes.
#[derive(Debug, Clone)]
pub struct AuditRecord<'a> {
    pub organization_id: Option<&'a str>,
    pub entity_type: AuditEntity,
    pub entity_id: &'a str,
    pub operation: AuditOperation,
    pub actor: &'a str,
    pub details: serde_json::Value,
}

/// Append-only audit logger. Wraps the audit_ops query functions
/// with a convenient API.
pub struct AuditLogger;

impl AuditLogger {
    /// Append an entry chained onto the current tail of the log.
    ///
    /// Must run on the write connection, inside the transaction of the
    /// mutation it records.
    pub fn log(conn: &Connection, record: AuditRecord<'_>) -> RiskGovResult<i64> {
        let prev_hash = audit_ops::last_hash(conn)?.unwrap_or_default();
        let details = serde_json::to_string(&record.details)?;
        let timestamp = crate::queries::row::ts(&Utc::now());
        let entry_hash = super::chain::entry_hash(
            &prev_hash,
            record.organization_id,
            record.entity_type.as_str(),
            record.entity_id,
            record.operation.as_str(),
            record.actor,
            &details,
            &timestamp,
        );

        audit_ops::insert_audit_row(
            conn,
            &audit_ops::AuditRow {
                organization_id: record.organization_id,
                entity_type: record.entity_type.as_str(),
                entity_id: record.entity_id,
                operation: record.operation.as_str(),
                actor: record.actor,
                details: &details,
                timestamp: &timestamp,
                prev_hash: &prev_hash,
                entry_hash: &entry_hash,
            },
        )
    }

    /// Shorthand for records without details.
    pub fn log_simple(
        conn: &Connection,
        organization_id: Option<&str>,
        entity_type: AuditEntity,
        entity_id: &str,
        operation: AuditOperation,
        actor: &str,
    ) -> RiskGovResult<i64> {
        Self::log(
            conn,
            AuditRecord {
                organization_id,
                entity_type,
                entity_id,
                operation,
                actor,
                details: serde_json::json!({}),
            },
        )
    }
}
