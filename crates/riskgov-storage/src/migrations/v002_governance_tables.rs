//! v002: risk taxonomy, appetite statements/categories, tolerance metrics.

use rusqlite::Connection;

use riskgov_core::errors::RiskGovResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RiskGovResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS risk_categories (
            id               TEXT PRIMARY KEY,
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            name             TEXT NOT NULL,
            parent_id        TEXT REFERENCES risk_categories(id),
            description      TEXT NOT NULL DEFAULT '',
            created_at       TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_risk_categories_org_name
            ON risk_categories(organization_id, name COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_risk_categories_parent ON risk_categories(parent_id);

        CREATE TABLE IF NOT EXISTS appetite_statements (
            id               TEXT PRIMARY KEY,
            organization_id  TEXT NOT NULL REFERENCES organizations(id),
            version          INTEGER NOT NULL,
            statement_text   TEXT NOT NULL,
            effective_from   TEXT NOT NULL,
            status           TEXT NOT NULL
                             CHECK (status IN ('DRAFT', 'APPROVED', 'SUPERSEDED')),
            approved_by      TEXT,
            approved_at      TEXT,
            superseded_by    TEXT,
            created_by       TEXT NOT NULL,
            created_at       TEXT NOT NULL,
            row_version      INTEGER NOT NULL DEFAULT 0,
            UNIQUE (organization_id, version)
        );

        -- At most one APPROVED statement per organization.
        CREATE UNIQUE INDEX IF NOT EXISTS idx_statements_one_approved
            ON appetite_statements(organization_id) WHERE status = 'APPROVED';

        CREATE TABLE IF NOT EXISTS appetite_categories (
            id              TEXT PRIMARY KEY,
            statement_id    TEXT NOT NULL REFERENCES appetite_statements(id),
            category_name   TEXT NOT NULL,
            appetite_level  TEXT NOT NULL
                            CHECK (appetite_level IN ('ZERO', 'LOW', 'MODERATE', 'HIGH')),
            rationale       TEXT NOT NULL DEFAULT '',
            created_at      TEXT NOT NULL
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_appetite_categories_statement_name
            ON appetite_categories(statement_id, category_name COLLATE NOCASE);

        CREATE TABLE IF NOT EXISTS tolerance_metrics (
            id                    TEXT PRIMARY KEY,
            organization_id       TEXT NOT NULL REFERENCES organizations(id),
            appetite_category_id  TEXT NOT NULL REFERENCES appetite_categories(id),
            name                  TEXT NOT NULL,
            description           TEXT NOT NULL DEFAULT '',
            metric_type           TEXT NOT NULL
                                  CHECK (metric_type IN ('MAXIMUM', 'MINIMUM', 'RANGE', 'DIRECTIONAL')),
            unit                  TEXT NOT NULL DEFAULT '',
            materiality_type      TEXT NOT NULL
                                  CHECK (materiality_type IN ('INTERNAL', 'EXTERNAL', 'DUAL')),
            green_max             REAL,
            amber_max             REAL,
            red_min               REAL,
            green_min             REAL,
            amber_min             REAL,
            red_max               REAL,
            kri_id                TEXT,
            is_active             INTEGER NOT NULL DEFAULT 0,
            never_activated       INTEGER NOT NULL DEFAULT 1,
            version               INTEGER NOT NULL DEFAULT 1,
            previous_version_id   TEXT REFERENCES tolerance_metrics(id),
            effective_from        TEXT NOT NULL,
            effective_to          TEXT,
            activated_by          TEXT,
            activated_at          TEXT,
            created_at            TEXT NOT NULL,
            row_version           INTEGER NOT NULL DEFAULT 0,
            CHECK (NOT (is_active = 1 AND never_activated = 1))
        );

        CREATE INDEX IF NOT EXISTS idx_metrics_org ON tolerance_metrics(organization_id);
        CREATE INDEX IF NOT EXISTS idx_metrics_category ON tolerance_metrics(appetite_category_id);
        CREATE INDEX IF NOT EXISTS idx_metrics_previous ON tolerance_metrics(previous_version_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
