//! Connection pool managing read/write connections.

pub mod pragmas;
pub mod read_pool;
pub mod write_connection;

use std::path::{Path, PathBuf};

use riskgov_core::config::StorageConfig;
use riskgov_core::errors::RiskGovResult;

pub use read_pool::ReadPool;
pub use write_connection::WriteConnection;

/// Manages the single write connection and the read connection pool.
pub struct ConnectionPool {
    pub writer: WriteConnection,
    pub readers: ReadPool,
    pub db_path: Option<PathBuf>,
}

impl ConnectionPool {
    /// Open a connection pool for the given database file.
    pub fn open(path: &Path, config: &StorageConfig) -> RiskGovResult<Self> {
        // Writer first: it creates the file and switches it to WAL before
        // read-only connections attach.
        let writer = WriteConnection::open(path, config)?;
        let readers = ReadPool::open(path, config)?;
        Ok(Self {
            writer,
            readers,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory connection pool (for testing).
    /// Readers are separate databases and never see the writer's data; the
    /// engine routes in-memory reads through the writer.
    pub fn open_in_memory(config: &StorageConfig) -> RiskGovResult<Self> {
        let writer = WriteConnection::open_in_memory(config)?;
        let readers = ReadPool::open_in_memory(1, config)?;
        Ok(Self {
            writer,
            readers,
            db_path: None,
        })
    }
}
