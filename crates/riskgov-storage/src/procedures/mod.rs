//! Governance procedures: each evaluates its lifecycle rule and performs its
//! write inside one transaction on the write connection, then records the
//! audit entry in that same transaction.

pub mod admin;
pub mod appetite;
pub mod library;
pub mod taxonomy;
pub mod tolerance;

use riskgov_core::errors::{GovernanceError, RiskGovError, RiskGovResult};
use riskgov_core::models::DeleteCheck;

/// Turn a refused [`DeleteCheck`] into `CannotDelete`, keeping its reason verbatim.
pub(crate) fn enforce_delete(check: DeleteCheck, entity: &'static str, id: &str) -> RiskGovResult<()> {
    if check.allowed {
        return Ok(());
    }
    Err(GovernanceError::CannotDelete {
        entity,
        id: id.to_string(),
        reason: check.reason.unwrap_or_default(),
    }
    .into())
}

pub(crate) fn concurrent(entity: &'static str, id: &str, expected: i64) -> RiskGovError {
    GovernanceError::ConcurrentModification {
        entity,
        id: id.to_string(),
        expected,
    }
    .into()
}
