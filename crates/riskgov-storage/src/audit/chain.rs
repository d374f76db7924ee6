//! Hash chain over the audit log. Each entry commits to its predecessor's
//! hash, so editing or removing any row breaks every later link.

use rusqlite::Connection;

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::AuditChainReport;

use crate::queries::audit_ops;

/// blake3 over the predecessor hash and every stored column of the entry.
/// Each field is length-prefixed, and a missing organization is distinct
/// from an empty one.
#[allow(clippy::too_many_arguments)]
pub fn entry_hash(
    prev_hash: &str,
    organization_id: Option<&str>,
    entity_type: &str,
    entity_id: &str,
    operation: &str,
    actor: &str,
    details: &str,
    timestamp: &str,
) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[u8::from(organization_id.is_some())]);
    for part in [
        prev_hash,
        organization_id.unwrap_or(""),
        entity_type,
        entity_id,
        operation,
        actor,
        details,
        timestamp,
    ] {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Walk the log in insertion order and recompute every link.
pub fn verify_chain(conn: &Connection) -> RiskGovResult<AuditChainReport> {
    let rows = audit_ops::all_rows_for_verification(conn)?;
    let mut expected_prev = String::new();
    let mut checked = 0u64;

    for row in rows {
        checked += 1;
        let recomputed = entry_hash(
            &row.prev_hash,
            row.organization_id.as_deref(),
            &row.entity_type,
            &row.entity_id,
            &row.operation,
            &row.actor,
            &row.details,
            &row.timestamp,
        );
        if row.prev_hash != expected_prev || row.entry_hash != recomputed {
            tracing::warn!(entry_id = row.id, "audit chain broken");
            return Ok(AuditChainReport {
                entries_checked: checked,
                first_broken_id: Some(row.id),
            });
        }
        expected_prev = row.entry_hash;
    }

    Ok(AuditChainReport {
        entries_checked: checked,
        first_broken_id: None,
    })
}
