//! v004: append-only, hash-chained audit log.

use rusqlite::Connection;

use riskgov_core::errors::RiskGovResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> RiskGovResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS audit_log (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            organization_id  TEXT,
            entity_type      TEXT NOT NULL,
            entity_id        TEXT NOT NULL,
            operation        TEXT NOT NULL,
            actor            TEXT NOT NULL DEFAULT 'system',
            details          TEXT NOT NULL DEFAULT '{}',
            timestamp        TEXT NOT NULL,
            prev_hash        TEXT NOT NULL,
            entry_hash       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_audit_org ON audit_log(organization_id);
        CREATE INDEX IF NOT EXISTS idx_audit_entity ON audit_log(entity_type, entity_id);
        CREATE INDEX IF NOT EXISTS idx_audit_operation ON audit_log(operation);
        CREATE INDEX IF NOT EXISTS idx_audit_actor ON audit_log(actor);
        CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_log(timestamp);

        CREATE TRIGGER IF NOT EXISTS audit_log_no_update
        BEFORE UPDATE ON audit_log
        BEGIN
            SELECT RAISE(ABORT, 'audit_log is append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS audit_log_no_delete
        BEFORE DELETE ON audit_log
        BEGIN
            SELECT RAISE(ABORT, 'audit_log is append-only');
        END;
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
