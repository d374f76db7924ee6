//! Schema migrations using PRAGMA user_version.

pub mod v001_organization_tables;
pub mod v002_governance_tables;
pub mod v003_library_tables;
pub mod v004_audit_tables;

use rusqlite::Connection;

use riskgov_core::errors::{RiskGovResult, StorageError};

type MigrationFn = fn(&Connection) -> RiskGovResult<()>;

/// Ordered list of all migrations.
const MIGRATIONS: &[(u32, MigrationFn)] = &[
    (1, v001_organization_tables::migrate),
    (2, v002_governance_tables::migrate),
    (3, v003_library_tables::migrate),
    (4, v004_audit_tables::migrate),
];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 4;

/// Run all pending migrations. Each version is applied in its own transaction.
pub fn run_migrations(conn: &Connection) -> RiskGovResult<u32> {
    let current = current_version(conn)?;
    let mut applied = 0;

    for (version, migrate) in MIGRATIONS {
        if current >= *version {
            continue;
        }
        let failed = |reason: String| StorageError::MigrationFailed {
            version: *version,
            reason,
        };

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| failed(e.to_string()))?;
        if let Err(e) = migrate(&tx) {
            let _ = tx.rollback();
            return Err(failed(e.to_string()).into());
        }
        tx.pragma_update(None, "user_version", version)
            .map_err(|e| failed(e.to_string()))?;
        tx.commit().map_err(|e| failed(e.to_string()))?;

        tracing::info!(version = version, "applied migration");
        applied += 1;
    }

    Ok(applied)
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> RiskGovResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| {
            StorageError::SqliteError {
                message: e.to_string(),
            }
            .into()
        })
}
