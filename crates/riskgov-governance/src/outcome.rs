use riskgov_core::errors::{GovernanceError, RiskGovError};
use riskgov_observability::events;

/// Emit a warning for refused lifecycle transitions. Other failures are the
/// caller's to report.
pub(crate) fn note_rejection(entity: &str, id: &str, operation: &str, err: &RiskGovError) {
    match err {
        RiskGovError::GovernanceError(
            GovernanceError::GovernanceViolation { .. }
            | GovernanceError::CannotDelete { .. }
            | GovernanceError::MissingKriLink { .. }
            | GovernanceError::ConcurrentModification { .. },
        )
        | RiskGovError::AdminError(_) => {
            events::transition_rejected(entity, id, operation, &err.to_string());
        }
        _ => {}
    }
}
