//! Divisions and departments.

use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{Department, Division};

use super::row::{get_ts, ts};
use crate::{map_unique_err, to_storage_err};

fn row_to_division(row: &Row<'_>) -> rusqlite::Result<Division> {
    Ok(Division {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        name: row.get(2)?,
        created_at: get_ts(row, 3)?,
    })
}

fn row_to_department(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        division_id: row.get(2)?,
        name: row.get(3)?,
        created_at: get_ts(row, 4)?,
    })
}

pub fn insert_division(conn: &Connection, d: &Division) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO divisions (id, organization_id, name, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![d.id, d.organization_id, d.name, ts(&d.created_at)],
    )
    .map_err(|e| map_unique_err(e, "division", &d.name))?;
    Ok(())
}

pub fn get_division(conn: &Connection, id: &str) -> RiskGovResult<Option<Division>> {
    conn.query_row(
        "SELECT id, organization_id, name, created_at FROM divisions WHERE id = ?1",
        params![id],
        row_to_division,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_divisions(conn: &Connection, organization_id: &str) -> RiskGovResult<Vec<Division>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, organization_id, name, created_at FROM divisions
             WHERE organization_id = ?1 ORDER BY name COLLATE NOCASE",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id], row_to_division)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn rename_division(conn: &Connection, id: &str, name: &str) -> RiskGovResult<usize> {
    conn.execute("UPDATE divisions SET name = ?2 WHERE id = ?1", params![id, name])
        .map_err(|e| map_unique_err(e, "division", name))
}

pub fn delete_division(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM divisions WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_departments(conn: &Connection, division_id: &str) -> RiskGovResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM departments WHERE division_id = ?1",
        params![division_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn insert_department(conn: &Connection, d: &Department) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO departments (id, organization_id, division_id, name, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![d.id, d.organization_id, d.division_id, d.name, ts(&d.created_at)],
    )
    .map_err(|e| map_unique_err(e, "department", &d.name))?;
    Ok(())
}

pub fn get_department(conn: &Connection, id: &str) -> RiskGovResult<Option<Department>> {
    conn.query_row(
        "SELECT id, organization_id, division_id, name, created_at FROM departments WHERE id = ?1",
        params![id],
        row_to_department,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_departments(
    conn: &Connection,
    organization_id: &str,
    division_id: Option<&str>,
) -> RiskGovResult<Vec<Department>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, organization_id, division_id, name, created_at FROM departments
             WHERE organization_id = ?1 AND (?2 IS NULL OR division_id = ?2)
             ORDER BY name COLLATE NOCASE",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id, division_id], row_to_department)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn delete_department(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM departments WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}
