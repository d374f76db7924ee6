//! v003: seed catalog, per-type organization libraries, generation log.

use rusqlite::Connection;

use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::LibraryItemType;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RiskGovResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS library_seed_catalog (
            code            TEXT PRIMARY KEY,
            item_type       TEXT NOT NULL
                            CHECK (item_type IN ('root_cause', 'impact', 'control', 'kri', 'kci')),
            title           TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            category_hints  TEXT NOT NULL DEFAULT '[]',
            industry_tags   TEXT NOT NULL DEFAULT '[]'
        );

        CREATE TABLE IF NOT EXISTS library_generation_log (
            id                TEXT PRIMARY KEY,
            organization_id   TEXT NOT NULL REFERENCES organizations(id),
            categories        TEXT NOT NULL DEFAULT '[]',
            industry          TEXT,
            root_cause_count  INTEGER NOT NULL DEFAULT 0,
            impact_count      INTEGER NOT NULL DEFAULT 0,
            control_count     INTEGER NOT NULL DEFAULT 0,
            kri_count         INTEGER NOT NULL DEFAULT 0,
            kci_count         INTEGER NOT NULL DEFAULT 0,
            generated_by      TEXT NOT NULL,
            created_at        TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_generation_log_org
            ON library_generation_log(organization_id, created_at);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    // One identically shaped table per item type.
    for item_type in LibraryItemType::ALL {
        let table = item_type.target_table();
        conn.execute_batch(&format!(
            "
            CREATE TABLE IF NOT EXISTS {table} (
                organization_id  TEXT NOT NULL REFERENCES organizations(id),
                code             TEXT NOT NULL,
                title            TEXT NOT NULL,
                description      TEXT NOT NULL DEFAULT '',
                updated_at       TEXT NOT NULL,
                PRIMARY KEY (organization_id, code)
            );
            "
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    }
    Ok(())
}
