//! Row-level operations on appetite_statements.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::{GovernanceError, RiskGovResult};
use riskgov_core::models::{AppetiteStatement, StatementStatus};

use super::row::{date, get_date, get_enum, get_opt_ts, get_ts, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, organization_id, version, statement_text, effective_from, status,
    approved_by, approved_at, superseded_by, created_by, created_at, row_version";

fn row_to_statement(row: &Row<'_>) -> rusqlite::Result<AppetiteStatement> {
    Ok(AppetiteStatement {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        version: row.get(2)?,
        statement_text: row.get(3)?,
        effective_from: get_date(row, 4)?,
        status: get_enum(row, 5, StatementStatus::parse)?,
        approved_by: row.get(6)?,
        approved_at: get_opt_ts(row, 7)?,
        superseded_by: row.get(8)?,
        created_by: row.get(9)?,
        created_at: get_ts(row, 10)?,
        row_version: row.get(11)?,
    })
}

pub fn insert_statement(conn: &Connection, s: &AppetiteStatement) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO appetite_statements (
            id, organization_id, version, statement_text, effective_from, status,
            approved_by, approved_at, superseded_by, created_by, created_at, row_version
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            s.id,
            s.organization_id,
            s.version,
            s.statement_text,
            date(&s.effective_from),
            s.status.as_str(),
            s.approved_by,
            s.approved_at.as_ref().map(ts),
            s.superseded_by,
            s.created_by,
            ts(&s.created_at),
            s.row_version,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert statement: {e}")))?;
    Ok(())
}

pub fn get_statement(conn: &Connection, id: &str) -> RiskGovResult<Option<AppetiteStatement>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM appetite_statements WHERE id = ?1"),
        params![id],
        row_to_statement,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// All statements of an organization, newest version first.
pub fn list_statements(conn: &Connection, organization_id: &str) -> RiskGovResult<Vec<AppetiteStatement>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM appetite_statements
             WHERE organization_id = ?1 ORDER BY version DESC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id], row_to_statement)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_approved(conn: &Connection, organization_id: &str) -> RiskGovResult<Option<AppetiteStatement>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM appetite_statements
             WHERE organization_id = ?1 AND status = 'APPROVED'"
        ),
        params![organization_id],
        row_to_statement,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_latest_draft(conn: &Connection, organization_id: &str) -> RiskGovResult<Option<AppetiteStatement>> {
    conn.query_row(
        &format!(
            "SELECT {COLUMNS} FROM appetite_statements
             WHERE organization_id = ?1 AND status = 'DRAFT'
             ORDER BY version DESC LIMIT 1"
        ),
        params![organization_id],
        row_to_statement,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Next version number for an organization (1 when it has none).
pub fn next_version(conn: &Connection, organization_id: &str) -> RiskGovResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) + 1 FROM appetite_statements WHERE organization_id = ?1",
        params![organization_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Compare-and-swap edit of a DRAFT's text. Returns false if the row version moved.
pub fn update_text(
    conn: &Connection,
    id: &str,
    statement_text: &str,
    effective_from: NaiveDate,
    expected_row_version: i64,
) -> RiskGovResult<bool> {
    let changed = conn
        .execute(
            "UPDATE appetite_statements
             SET statement_text = ?2, effective_from = ?3, row_version = row_version + 1
             WHERE id = ?1 AND row_version = ?4",
            params![id, statement_text, date(&effective_from), expected_row_version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn mark_approved(
    conn: &Connection,
    id: &str,
    approver_id: &str,
    approved_at: DateTime<Utc>,
    expected_row_version: i64,
) -> RiskGovResult<bool> {
    let changed = conn
        .execute(
            "UPDATE appetite_statements
             SET status = 'APPROVED', approved_by = ?2, approved_at = ?3,
                 row_version = row_version + 1
             WHERE id = ?1 AND status = 'DRAFT' AND row_version = ?4",
            params![id, approver_id, ts(&approved_at), expected_row_version],
        )
        .map_err(|e| match &e {
            // idx_statements_one_approved fired.
            rusqlite::Error::SqliteFailure(err, _)
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                GovernanceError::violation("organization already has an approved statement").into()
            }
            _ => to_storage_err(format!("approve statement: {e}")),
        })?;
    Ok(changed == 1)
}

pub fn mark_superseded(
    conn: &Connection,
    id: &str,
    successor_id: &str,
    expected_row_version: i64,
) -> RiskGovResult<bool> {
    let changed = conn
        .execute(
            "UPDATE appetite_statements
             SET status = 'SUPERSEDED', superseded_by = ?2, row_version = row_version + 1
             WHERE id = ?1 AND status = 'APPROVED' AND row_version = ?3",
            params![id, successor_id, expected_row_version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn delete_statement(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM appetite_statements WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_for_organization(conn: &Connection, organization_id: &str) -> RiskGovResult<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM appetite_statements WHERE organization_id = ?1",
        params![organization_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
