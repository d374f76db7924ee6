//! # riskgov-storage
//!
//! SQLite persistence for the risk governance workspace: connection pool,
//! schema migrations, row-level queries, the transactional governance
//! procedures, and the hash-chained audit log.

pub mod audit;
pub mod engine;
pub mod migrations;
pub mod pool;
pub mod procedures;
pub mod queries;

pub use engine::StorageEngine;

use rusqlite::Connection;

use riskgov_core::errors::{AdminError, RiskGovError, RiskGovResult, StorageError};

/// Wrap a low-level failure message as a storage error.
pub fn to_storage_err(message: String) -> RiskGovError {
    RiskGovError::StorageError(StorageError::SqliteError { message })
}

/// Map a unique-constraint failure to `DuplicateName`, anything else to a
/// storage error.
pub(crate) fn map_unique_err(e: rusqlite::Error, entity: &'static str, name: &str) -> RiskGovError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
        {
            AdminError::DuplicateName {
                entity,
                name: name.to_string(),
            }
            .into()
        }
        _ => to_storage_err(e.to_string()),
    }
}

/// Run `f` inside a transaction on `conn`. Commits on `Ok`, rolls back on `Err`.
pub(crate) fn in_transaction<T, F>(conn: &Connection, label: &str, f: F) -> RiskGovResult<T>
where
    F: FnOnce(&Connection) -> RiskGovResult<T>,
{
    let tx = conn
        .unchecked_transaction()
        .map_err(|e| to_storage_err(format!("{label} begin: {e}")))?;

    match f(&tx) {
        Ok(value) => {
            tx.commit()
                .map_err(|e| to_storage_err(format!("{label} commit: {e}")))?;
            Ok(value)
        }
        Err(e) => {
            let _ = tx.rollback();
            Err(e)
        }
    }
}
