//! Row-level operations on tolerance_metrics.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{
    MaterialityType, MetricType, Thresholds, ToleranceMetric, ToleranceMetricEdit,
};

use super::row::{date, get_bool, get_date, get_enum, get_opt_date, get_opt_ts, get_ts, ts};
use crate::to_storage_err;

const COLUMNS: &str = "id, organization_id, appetite_category_id, name, description,
    metric_type, unit, materiality_type,
    green_max, amber_max, red_min, green_min, amber_min, red_max,
    kri_id, is_active, never_activated, version, previous_version_id,
    effective_from, effective_to, activated_by, activated_at, created_at, row_version";

fn row_to_metric(row: &Row<'_>) -> rusqlite::Result<ToleranceMetric> {
    Ok(ToleranceMetric {
        id: row.get(0)?,
        organization_id: row.get(1)?,
        appetite_category_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        metric_type: get_enum(row, 5, MetricType::parse)?,
        unit: row.get(6)?,
        materiality_type: get_enum(row, 7, MaterialityType::parse)?,
        thresholds: Thresholds {
            green_max: row.get(8)?,
            amber_max: row.get(9)?,
            red_min: row.get(10)?,
            green_min: row.get(11)?,
            amber_min: row.get(12)?,
            red_max: row.get(13)?,
        },
        kri_id: row.get(14)?,
        is_active: get_bool(row, 15)?,
        never_activated: get_bool(row, 16)?,
        version: row.get(17)?,
        previous_version_id: row.get(18)?,
        effective_from: get_date(row, 19)?,
        effective_to: get_opt_date(row, 20)?,
        activated_by: row.get(21)?,
        activated_at: get_opt_ts(row, 22)?,
        created_at: get_ts(row, 23)?,
        row_version: row.get(24)?,
    })
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RiskGovResult<Vec<ToleranceMetric>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, row_to_metric)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

pub fn insert_metric(conn: &Connection, m: &ToleranceMetric) -> RiskGovResult<()> {
    let t = &m.thresholds;
    conn.execute(
        "INSERT INTO tolerance_metrics (
            id, organization_id, appetite_category_id, name, description,
            metric_type, unit, materiality_type,
            green_max, amber_max, red_min, green_min, amber_min, red_max,
            kri_id, is_active, never_activated, version, previous_version_id,
            effective_from, effective_to, activated_by, activated_at, created_at, row_version
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
                  ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25)",
        params![
            m.id,
            m.organization_id,
            m.appetite_category_id,
            m.name,
            m.description,
            m.metric_type.as_str(),
            m.unit,
            m.materiality_type.as_str(),
            t.green_max,
            t.amber_max,
            t.red_min,
            t.green_min,
            t.amber_min,
            t.red_max,
            m.kri_id,
            m.is_active,
            m.never_activated,
            m.version,
            m.previous_version_id,
            date(&m.effective_from),
            m.effective_to.as_ref().map(date),
            m.activated_by,
            m.activated_at.as_ref().map(ts),
            ts(&m.created_at),
            m.row_version,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert metric: {e}")))?;
    Ok(())
}

pub fn get_metric(conn: &Connection, id: &str) -> RiskGovResult<Option<ToleranceMetric>> {
    conn.query_row(
        &format!("SELECT {COLUMNS} FROM tolerance_metrics WHERE id = ?1"),
        params![id],
        row_to_metric,
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn list_by_organization(conn: &Connection, organization_id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
    collect(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM tolerance_metrics
             WHERE organization_id = ?1 ORDER BY name, version"
        ),
        params![organization_id],
    )
}

pub fn list_by_category(conn: &Connection, appetite_category_id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
    collect(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM tolerance_metrics
             WHERE appetite_category_id = ?1 ORDER BY name, version"
        ),
        params![appetite_category_id],
    )
}

pub fn count_by_category(conn: &Connection, appetite_category_id: &str) -> RiskGovResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM tolerance_metrics WHERE appetite_category_id = ?1",
        params![appetite_category_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Metrics attached to any category of the statement.
pub fn count_by_statement(conn: &Connection, statement_id: &str) -> RiskGovResult<usize> {
    conn.query_row(
        "SELECT COUNT(*) FROM tolerance_metrics m
         JOIN appetite_categories c ON c.id = m.appetite_category_id
         WHERE c.statement_id = ?1",
        params![statement_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn count_active(conn: &Connection, organization_id: &str) -> RiskGovResult<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM tolerance_metrics WHERE organization_id = ?1 AND is_active = 1",
        params![organization_id],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Compare-and-swap edit of a never-activated metric.
pub fn update_definition(
    conn: &Connection,
    id: &str,
    edit: &ToleranceMetricEdit,
    expected_row_version: i64,
) -> RiskGovResult<bool> {
    let t = &edit.thresholds;
    let changed = conn
        .execute(
            "UPDATE tolerance_metrics SET
                name = ?2, description = ?3, metric_type = ?4, unit = ?5,
                materiality_type = ?6, green_max = ?7, amber_max = ?8, red_min = ?9,
                green_min = ?10, amber_min = ?11, red_max = ?12, kri_id = ?13,
                effective_from = ?14, row_version = row_version + 1
             WHERE id = ?1 AND row_version = ?15 AND never_activated = 1",
            params![
                id,
                edit.name,
                edit.description,
                edit.metric_type.as_str(),
                edit.unit,
                edit.materiality_type.as_str(),
                t.green_max,
                t.amber_max,
                t.red_min,
                t.green_min,
                t.amber_min,
                t.red_max,
                edit.kri_id,
                date(&edit.effective_from),
                expected_row_version,
            ],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn mark_active(
    conn: &Connection,
    id: &str,
    actor: &str,
    at: DateTime<Utc>,
    expected_row_version: i64,
) -> RiskGovResult<bool> {
    let changed = conn
        .execute(
            "UPDATE tolerance_metrics SET
                is_active = 1, never_activated = 0, activated_by = ?2, activated_at = ?3,
                row_version = row_version + 1
             WHERE id = ?1 AND never_activated = 1 AND row_version = ?4",
            params![id, actor, ts(&at), expected_row_version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn mark_inactive(
    conn: &Connection,
    id: &str,
    effective_to: NaiveDate,
    expected_row_version: i64,
) -> RiskGovResult<bool> {
    let changed = conn
        .execute(
            "UPDATE tolerance_metrics SET
                is_active = 0, effective_to = ?2, row_version = row_version + 1
             WHERE id = ?1 AND is_active = 1 AND row_version = ?3",
            params![id, date(&effective_to), expected_row_version],
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(changed == 1)
}

pub fn delete_metric(conn: &Connection, id: &str) -> RiskGovResult<usize> {
    conn.execute("DELETE FROM tolerance_metrics WHERE id = ?1", params![id])
        .map_err(|e| to_storage_err(e.to_string()))
}
