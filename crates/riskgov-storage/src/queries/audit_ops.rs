//! Insert and query audit log rows.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use riskgov_core::constants::{DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT};
use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{AuditEntity, AuditEntry, AuditOperation, AuditQuery};

use super::row::{get_enum, get_ts, ts};
use crate::to_storage_err;

/// Encoded columns of a new audit row.
pub struct AuditRow<'a> {
    pub organization_id: Option<&'a str>,
    pub entity_type: &'a str,
    pub entity_id: &'a str,
    pub operation: &'a str,
    pub actor: &'a str,
    pub details: &'a str,
    pub timestamp: &'a str,
    pub prev_hash: &'a str,
    pub entry_hash: &'a str,
}

/// Raw stored columns, as hashed.
pub struct StoredAuditRow {
    pub id: i64,
    pub organization_id: Option<String>,
    pub entity_type: String,
    pub entity_id: String,
    pub operation: String,
    pub actor: String,
    pub details: String,
    pub timestamp: String,
    pub prev_hash: String,
    pub entry_hash: String,
}

pub fn insert_audit_row(conn: &Connection, row: &AuditRow<'_>) -> RiskGovResult<i64> {
    conn.execute(
        "INSERT INTO audit_log (
            organization_id, entity_type, entity_id, operation, actor,
            details, timestamp, prev_hash, entry_hash
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            row.organization_id,
            row.entity_type,
            row.entity_id,
            row.operation,
            row.actor,
            row.details,
            row.timestamp,
            row.prev_hash,
            row.entry_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(conn.last_insert_rowid())
}

/// Hash of the most recent entry, if any.
pub fn last_hash(conn: &Connection) -> RiskGovResult<Option<String>> {
    conn.query_row(
        "SELECT entry_hash FROM audit_log ORDER BY id DESC LIMIT 1",
        [],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<AuditEntry> {
    let details_raw: String = row.get(6)?;
    Ok(AuditEntry {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        entity_type: get_enum(row, 2, AuditEntity::parse)?,
        entity_id: row.get(3)?,
        operation: get_enum(row, 4, AuditOperation::parse)?,
        actor: row.get(5)?,
        details: serde_json::from_str(&details_raw).unwrap_or(serde_json::Value::Null),
        timestamp: get_ts(row, 7)?,
        prev_hash: row.get(8)?,
        entry_hash: row.get(9)?,
    })
}

/// Filtered query, newest first. The limit is clamped to
/// [`MAX_AUDIT_QUERY_LIMIT`].
pub fn query(conn: &Connection, filter: &AuditQuery) -> RiskGovResult<Vec<AuditEntry>> {
    let mut sql = String::from(
        "SELECT id, organization_id, entity_type, entity_id, operation, actor,
                details, timestamp, prev_hash, entry_hash
         FROM audit_log WHERE 1 = 1",
    );
    let mut values: Vec<Value> = Vec::new();

    let mut push = |clause: &str, value: Value| {
        values.push(value);
        sql.push_str(&format!(" AND {clause} ?{}", values.len()));
    };
    if let Some(org) = &filter.organization_id {
        push("organization_id =", Value::Text(org.clone()));
    }
    if let Some(entity_type) = filter.entity_type {
        push("entity_type =", Value::Text(entity_type.as_str().to_string()));
    }
    if let Some(entity_id) = &filter.entity_id {
        push("entity_id =", Value::Text(entity_id.clone()));
    }
    if let Some(actor) = &filter.actor {
        push("actor =", Value::Text(actor.clone()));
    }
    if let Some(operation) = filter.operation {
        push("operation =", Value::Text(operation.as_str().to_string()));
    }
    if let Some(from) = &filter.from {
        push("timestamp >=", Value::Text(ts(from)));
    }
    if let Some(to) = &filter.to {
        push("timestamp <=", Value::Text(ts(to)));
    }

    let limit = filter
        .limit
        .unwrap_or(DEFAULT_AUDIT_QUERY_LIMIT)
        .clamp(1, MAX_AUDIT_QUERY_LIMIT);
    sql.push_str(&format!(" ORDER BY id DESC LIMIT {limit}"));

    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), row_to_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// All entries for one entity, oldest first.
pub fn query_by_entity(conn: &Connection, entity_id: &str) -> RiskGovResult<Vec<AuditEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, organization_id, entity_type, entity_id, operation, actor,
                    details, timestamp, prev_hash, entry_hash
             FROM audit_log WHERE entity_id = ?1 ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![entity_id], row_to_entry)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Every row in insertion order, undecoded.
pub fn all_rows_for_verification(conn: &Connection) -> RiskGovResult<Vec<StoredAuditRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, organization_id, entity_type, entity_id, operation, actor,
                    details, timestamp, prev_hash, entry_hash
             FROM audit_log ORDER BY id ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredAuditRow {
                id: row.get(0)?,
                organization_id: row.get(1)?,
                entity_type: row.get(2)?,
                entity_id: row.get(3)?,
                operation: row.get(4)?,
                actor: row.get(5)?,
                details: row.get(6)?,
                timestamp: row.get(7)?,
                prev_hash: row.get(8)?,
                entry_hash: row.get(9)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
