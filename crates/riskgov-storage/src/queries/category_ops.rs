//! Row-level operations on appetite_categories.

use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{AppetiteCategory, AppetiteLevel};

use super::row::{get_enum, get_ts, ts};
use crate::{map_unique_err, to_storage_err};

const COLUMNS: &str = "id, statement_id, category_name, appetite_level, rationale, created_at";

fn row_to_category(row: &Row<'_>) -> rusqlite::Result<AppetiteCategory> {
    Ok(AppetiteCategory {
        id: row.get(0)?,
        statement_id: row.get(1)?,
        category_name: row.get(2)?,
        appetite_level: get_enum(row, 3, AppetiteLevel::parse)?,
        rationale: row.get(4)?,
        created_at: get_ts(row, 5)?,
    })
}

pub fn insert_category(conn: &Connection, c: &AppetiteCategory) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO appetite_categories (
            id, statement_id, category_name, appetite_level, rationale, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            c.id,
            c.statement_id,
            c.category_name,
            c.appetite_level.as_str(),
            c.rationale,
            ts(&c.created_at),
        ],
    )
    .map_err(|e| map_unique_err(e, "appetite category", &c.category_name))?;
    Ok(())
}

pub fn get_category(conn: &Connection, id: &str) -> RiskGovResult<Option<AppetiteCategory>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM appetite_categories WHERE id = ?1"),
        params![id],
        row_to_category,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_by_statement(conn: &Connection, statement_id: &str) -> RiskGovResult<Vec<AppetiteCategory>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {COLUMNS} FROM appetite_categories
             WHERE statement_id = ?1 ORDER BY category_name COLLATE NOCASE"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![statement_id], row_to_category)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn update_category(
    conn: &Connection,
    id: &str,
    appetite_level: AppetiteLevel,
    rationale: &str,
) -> RiskGovResult<usize> {
    conn.execute(
        "UPDATE appetite_categories SET appetite_level = ?2, rationale = ?3 WHERE id = ?1",
        params![id, appetite_level.as_str(), rationale],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn delete_category(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM appetite_categories WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn delete_by_statement(conn: &Connection, statement_id: &str) -> RiskGovResult<usize> {
    conn.execute(
        "DELETE FROM appetite_categories WHERE statement_id = ?1",
        params![statement_id],
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Repoint every category of `from_statement` at `to_statement`.
/// Returns the ids that moved.
pub fn migrate_to_statement(
    conn: &Connection,
    from_statement: &str,
    to_statement: &str,
) -> RiskGovResult<Vec<String>> {
    let ids: Vec<String> = list_by_statement(conn, from_statement)?
        .into_iter()
        .map(|c| c.id)
        .collect();
    conn.execute(
        "UPDATE appetite_categories SET statement_id = ?2 WHERE statement_id = ?1",
        params![from_statement, to_statement],
    )
    .map_err(|e| to_storage_err(format!("migrate categories: {e}")))?;
    Ok(ids)
}
