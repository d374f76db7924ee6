//! Tenant-scoped audit trail viewer.

use std::sync::Arc;

use riskgov_core::constants::{DEFAULT_AUDIT_QUERY_LIMIT, MAX_AUDIT_QUERY_LIMIT};
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{AuditChainReport, AuditEntry, AuditQuery, Capability, SessionContext};
use riskgov_core::traits::IAuditStorage;

pub struct AuditTrailService {
    store: Arc<dyn IAuditStorage>,
}

impl AuditTrailService {
    pub fn new(store: Arc<dyn IAuditStorage>) -> Self {
        Self { store }
    }

    /// Newest first. Non-super-admins are pinned to their own organization;
    /// regulators must first narrow their session to a granted one.
    pub fn query(&self, ctx: &SessionContext, query: &AuditQuery) -> RiskGovResult<Vec<AuditEntry>> {
        ctx.require(Capability::ViewAuditTrail)?;
        let mut scoped = query.clone();
        match &query.organization_id {
            Some(org) if !ctx.can_access_organization(org) => {
                return Err(ctx.denied(&format!("view audit trail of {org}")));
            }
            None if !ctx.can(Capability::ManageOrganizations) => {
                scoped.organization_id = Some(ctx.organization_id.clone());
            }
            _ => {}
        }
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(RiskGovError::validation("from", "must not be after `to`"));
            }
        }
        scoped.limit = Some(
            query
                .limit
                .unwrap_or(DEFAULT_AUDIT_QUERY_LIMIT)
                .clamp(1, MAX_AUDIT_QUERY_LIMIT),
        );
        let entries = self.store.query_audit(&scoped)?;
        tracing::debug!(
            organization_id = ?scoped.organization_id,
            count = entries.len(),
            "audit trail queried"
        );
        Ok(entries)
    }

    /// Platform-wide hash chain check.
    pub fn verify_chain(&self, ctx: &SessionContext) -> RiskGovResult<AuditChainReport> {
        ctx.require(Capability::ManageOrganizations)?;
        let report = self.store.verify_audit_chain()?;
        if let Some(id) = report.first_broken_id {
            tracing::warn!(first_broken_id = id, "audit chain broken");
        }
        Ok(report)
    }
}
