//! Append-only audit trail with a blake3 hash chain.

pub mod chain;
pub mod logger;

pub use chain::verify_chain;
pub use logger::{AuditLogger, AuditRecord};
