//! Regulators and their per-organization access grants.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{Regulator, RegulatorAccess};

use super::row::{get_opt_ts, get_ts, ts};
use crate::{map_unique_err, to_storage_err};

fn row_to_regulator(row: &Row<'_>) -> rusqlite::Result<Regulator> {
    Ok(Regulator {
        id: row.get(0)?,
        name: row.get(1)?,
        jurisdiction: row.get(2)?,
        contact_email: row.get(3)?,
        created_at: get_ts(row, 4)?,
    })
}

fn row_to_access(row: &Row<'_>) -> rusqlite::Result<RegulatorAccess> {
    Ok(RegulatorAccess {
        regulator_id: row.get(0)?,
        organization_id: row.get(1)?,
        granted_by: row.get(2)?,
        granted_at: get_ts(row, 3)?,
        revoked_at: get_opt_ts(row, 4)?,
    })
}

pub fn insert(conn: &Connection, r: &Regulator) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO regulators (id, name, jurisdiction, contact_email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![r.id, r.name, r.jurisdiction, r.contact_email, ts(&r.created_at)],
    )
    .map_err(|e| map_unique_err(e, "regulator", &r.name))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> RiskGovResult<Option<Regulator>> {
    conn.query_row(
        "SELECT id, name, jurisdiction, contact_email, created_at FROM regulators WHERE id = ?1",
        params![id],
        row_to_regulator,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list(conn: &Connection) -> RiskGovResult<Vec<Regulator>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, jurisdiction, contact_email, created_at FROM regulators
             ORDER BY name COLLATE NOCASE",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_regulator)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn delete(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM regulator_access WHERE regulator_id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))?;
    conn.execute("DELETE FROM regulators WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Grant or re-grant. A revoked row is reopened in place.
pub fn upsert_access(conn: &Connection, a: &RegulatorAccess) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO regulator_access (regulator_id, organization_id, granted_by, granted_at, revoked_at)
         VALUES (?1, ?2, ?3, ?4, NULL)
         ON CONFLICT(regulator_id, organization_id) DO UPDATE SET
            granted_by = excluded.granted_by,
            granted_at = excluded.granted_at,
            revoked_at = NULL",
        params![a.regulator_id, a.organization_id, a.granted_by, ts(&a.granted_at)],
    )
    .map_err(|e| to_storage_err(format!("grant regulator access: {e}")))?;
    Ok(())
}

pub fn get_access(
    conn: &Connection,
    regulator_id: &str,
    organization_id: &str,
) -> RiskGovResult<Option<RegulatorAccess>> {
    conn.query_row(
        "SELECT regulator_id, organization_id, granted_by, granted_at, revoked_at
         FROM regulator_access WHERE regulator_id = ?1 AND organization_id = ?2",
        params![regulator_id, organization_id],
        row_to_access,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn revoke_access(
    conn: &Connection,
    regulator_id: &str,
    organization_id: &str,
    at: DateTime<Utc>,
) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE regulator_access SET revoked_at = ?3
         WHERE regulator_id = ?1 AND organization_id = ?2 AND revoked_at IS NULL",
        params![regulator_id, organization_id, ts(&at)],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_access(conn: &Connection, regulator_id: &str) -> RiskGovResult<Vec<RegulatorAccess>> {
    let mut stmt = conn
        .prepare(
            "SELECT regulator_id, organization_id, granted_by, granted_at, revoked_at
             FROM regulator_access WHERE regulator_id = ?1 ORDER BY granted_at",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![regulator_id], row_to_access)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_active_access(conn: &Connection, regulator_id: &str) -> RiskGovResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM regulator_access WHERE regulator_id = ?1 AND revoked_at IS NULL",
        params![regulator_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_for_organization(conn: &Connection, organization_id: &str) -> RiskGovResult<Vec<Regulator>> {
    let mut stmt = conn
        .prepare(
            "SELECT r.id, r.name, r.jurisdiction, r.contact_email, r.created_at
             FROM regulators r
             JOIN regulator_access a ON a.regulator_id = r.id
             WHERE a.organization_id = ?1 AND a.revoked_at IS NULL
             ORDER BY r.name COLLATE NOCASE",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id], row_to_regulator)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
