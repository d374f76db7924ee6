use crate::errors::RiskGovResult;
use crate::models::{AuditChainReport, AuditEntry, AuditQuery};

/// Read side of the append-only audit trail.
pub trait IAuditStorage: Send + Sync {
    /// Entries matching `query`, newest first.
    fn query_audit(&self, query: &AuditQuery) -> RiskGovResult<Vec<AuditEntry>>;
    /// Recompute every entry hash and report the first mismatch.
    fn verify_audit_chain(&self) -> RiskGovResult<AuditChainReport>;
}
