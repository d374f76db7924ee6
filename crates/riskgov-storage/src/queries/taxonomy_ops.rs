//! Row-level operations on risk_categories.

use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::RiskCategory;

use super::row::{get_ts, ts};
use crate::{map_unique_err, to_storage_err};

const COLUMNS: &str = "id, organization_id, name, parent_id, description, created_at";

fn row_to_risk_category(row: &Row<'_>) -> rusqlite::Result<RiskCategory> {
    Ok(RiskCategory {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        name: row.get(2)?,
        parent_id: row.get(3)?,
        description: row.get(4)?,
        created_at: get_ts(row, 5)?,
    })
}

pub fn insert(conn: &Connection, c: &RiskCategory) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO risk_categories (id, organization_id, name, parent_id, description, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            c.id,
            c.organization_id,
            c.name,
            c.parent_id,
            c.description,
            ts(&c.created_at),
        ],
    )
    .map_err(|e| map_unique_err(e, "risk category", &c.name))?;
    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> RiskGovResult<Option<RiskCategory>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM risk_categories WHERE id = ?1"),
        params![id],
        row_to_risk_category,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list(conn: &Connection, organization_id: &str) -> RiskGovResult<Vec<RiskCategory>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM risk_categories
             WHERE organization_id = ?1 ORDER BY name COLLATE NOCASE"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id], row_to_risk_category)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn rename(conn: &Connection, id: &str, name: &str) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE risk_categories SET name = ?2 WHERE id = ?1",
        params![id, name],
    )
    .map_err(|e| map_unique_err(e, "risk category", name))
}

pub fn count_children(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM risk_categories WHERE parent_id = ?1",
        params![id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn delete(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM risk_categories WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}
