//! Seed catalog, per-type library tables, and the generation log.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{GenerationCounts, GenerationLog, LibraryItem, LibraryItemType, SeedItem};

use super::row::{get_enum, get_string_list, get_ts, ts};
use crate::to_storage_err;

fn json_list(values: &[String]) -> RiskGovResult<String> {
    Ok(serde_json::to_string(values)?)
}

pub fn upsert_seed(conn: &Connection, item: &SeedItem) -> RiskGovResult<()> {
    conn.execute(
        "INSERT INTO library_seed_catalog
            (code, item_type, title, description, category_hints, industry_tags)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(code) DO UPDATE SET
            item_type = excluded.item_type,
            title = excluded.title,
            description = excluded.description,
            category_hints = excluded.category_hints,
            industry_tags = excluded.industry_tags",
        params![
            item.code,
            item.item_type.as_str(),
            item.title,
            item.description,
            json_list(&item.category_hints)?,
            json_list(&item.industry_tags)?,
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert seed {}: {e}", item.code)))?;
    Ok(())
}

fn row_to_seed(row: &Row<'_>) -> rusqlite::Result<SeedItem> {
    Ok(SeedItem {
        code: row.get(0)?,
        item_type: get_enum(row, 1, LibraryItemType::parse)?,
        title: row.get(2)?,
        description: row.get(3)?,
        category_hints: get_string_list(row, 4)?,
        industry_tags: get_string_list(row, 5)?,
    })
}

pub fn list_seeds(conn: &Connection) -> RiskGovResult<Vec<SeedItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT code, item_type, title, description, category_hints, industry_tags
             FROM library_seed_catalog ORDER BY code",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], row_to_seed)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Insert or refresh one item in its type's table.
pub fn upsert_library_item(
    conn: &Connection,
    organization_id: &str,
    item: &SeedItem,
    at: DateTime<Utc>,
) -> RiskGovResult<()> {
    let table = item.item_type.target_table();
    conn.execute(
        &format!(
            "INSERT INTO {table} (organization_id, code, title, description, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(organization_id, code) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                updated_at = excluded.updated_at"
        ),
        params![organization_id, item.code, item.title, item.description, ts(&at)],
    )
    .map_err(|e| to_storage_err(format!("upsert {table}: {e}")))?;
    Ok(())
}

pub fn list_library_items(
    conn: &Connection,
    organization_id: &str,
    item_type: LibraryItemType,
) -> RiskGovResult<Vec<LibraryItem>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT organization_id, code, title, description, updated_at
             FROM {} WHERE organization_id = ?1 ORDER BY code",
            item_type.target_table()
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id], |row| {
            Ok(LibraryItem {
                organization_id: row.get(0)?,
                code: row.get(1)?,
                item_type,
                title: row.get(2)?,
                description: row.get(3)?,
                updated_at: get_ts(row, 4)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn insert_generation_log(conn: &Connection, log: &GenerationLog) -> RiskGovResult<()> {
    let c = &log.counts;
    conn.execute(
        "INSERT INTO library_generation_log (
            id, organization_id, categories, industry,
            root_cause_count, impact_count, control_count, kri_count, kci_count,
            generated_by, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            log.id,
            log.organization_id,
            json_list(&log.categories)?,
            log.industry,
            c.root_cause,
            c.impact,
            c.control,
            c.kri,
            c.kci,
            log.generated_by,
            ts(&log.created_at),
        ],
    )
    .map_err(|e| to_storage_err(format!("insert generation log: {e}")))?;
    Ok(())
}

pub fn list_generation_logs(conn: &Connection, organization_id: &str) -> RiskGovResult<Vec<GenerationLog>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, organization_id, categories, industry,
                    root_cause_count, impact_count, control_count, kri_count, kci_count,
                    generated_by, created_at
             FROM library_generation_log
             WHERE organization_id = ?1 ORDER BY created_at DESC, rowid DESC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![organization_id], |row| {
            Ok(GenerationLog {
                id: row.get(0)?,
                organization_id: row.get(1)?,
                categories: get_string_list(row, 2)?,
                industry: row.get(3)?,
                counts: GenerationCounts {
                    root_cause: row.get(4)?,
                    impact: row.get(5)?,
                    control: row.get(6)?,
                    kri: row.get(7)?,
                    kci: row.get(8)?,
                },
                generated_by: row.get(9)?,
                created_at: get_ts(row, 10)?,
            })
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
