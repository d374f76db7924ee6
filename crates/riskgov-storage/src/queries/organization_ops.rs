//! Row-level operations on organizations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{Organization, OrganizationStatus, OrganizationSummary};

use super::row::{get_enum, get_ts, ts};
use crate::{map_unique_err, to_storage_err};

const COLUMNS: &str = "id, name, industry, status, created_at";

fn row_to_organization(row: &Row<'_>) -> rusqlite::Result<Organization> {
    Ok(Organization {
        id: row.get(0)?,
        name: row.get(1)?,
        industry: row.get(2)?,
        status: get_enum(row, 3, OrganizationStatus::parse)?,
        created_at: get_ts(row, 4)?,
    })
}

pub fn insert(conn: &Connection, org: &Organization) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO organizations (id, name, industry, status, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            org.id,
            org.name,
            org.industry,
            org.status.as_str(),
            ts(&org.created_at),
        ],
    )
    .map_err(|e| map_unique_err(e, "organization", &org.name))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> RiskGovResult<Option<Organization>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM organizations WHERE id = ?1"),
        params![id],
        row_to_organization,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn find_by_name(conn: &Connection, name: &str) -> RiskGovResult<Option<Organization>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM organizations WHERE name = ?1 COLLATE NOCASE"),
        params![name.trim()],
        row_to_organization,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Every organization with its per-tenant counts, in one pass.
pub fn list_summaries(conn: &Connection) -> RiskGovResult<Vec<OrganizationSummary>> {
    let mut stmt = conn
        .prepare(
            "SELECT o.id, o.name, o.industry, o.status, o.created_at,
                (SELECT COUNT(*) FROM user_profiles u WHERE u.organization_id = o.id),
                (SELECT COUNT(*) FROM user_invitations i
                    WHERE i.organization_id = o.id AND i.status = 'PENDING'),
                (SELECT COUNT(*) FROM appetite_statements s WHERE s.organization_id = o.id),
                (SELECT COUNT(*) FROM tolerance_metrics m
                    WHERE m.organization_id = o.id AND m.is_active = 1)
             FROM organizations o
             ORDER BY o.name COLLATE NOCASE",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(OrganizationSummary {
                organization: row_to_organization(row)?,
                user_count: row.get(5)?,
                pending_invitation_count: row.get(6)?,
                statement_count: row.get(7)?,
                active_metric_count: row.get(8)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_status(conn: &Connection, id: &str, status: OrganizationStatus) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE organizations SET status = ?2 WHERE id = ?1",
        params![id, status.as_str()],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_industry(conn: &Connection, id: &str, industry: Option<&str>) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE organizations SET industry = ?2 WHERE id = ?1",
        params![id, industry],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}
