/// Violations of the appetite/tolerance governance lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum GovernanceError {
    /// A lifecycle precondition does not hold for the requested transition.
    #[error("governance violation: {reason}")]
    GovernanceViolation { reason: String },

    /// The record is part of the decision trail and may not be hard-deleted.
    #[error("cannot delete {entity} {id}: {reason}")]
    CannotDelete {
        entity: &'static str,
        id: String,
        reason: String,
    },

    /// A tolerance metric cannot be activated without a linked KRI.
    #[error("tolerance metric {metric_id} has no linked KRI")]
    MissingKriLink { metric_id: String },

    /// The row changed between read and write.
    #[error("{entity} {id} was modified concurrently (expected row version {expected})")]
    ConcurrentModification {
        entity: &'static str,
        id: String,
        expected: i64,
    },

    /// The appetite chain could not be evaluated because an input fetch failed.
    #[error("chain validation unavailable for organization {organization_id}: {reason}")]
    ChainValidationUnavailable {
        organization_id: String,
        reason: String,
    },
}

impl GovernanceError {
    pub fn violation(reason: impl Into<String>) -> Self {
        Self::GovernanceViolation {
            reason: reason.into(),
        }
    }
}
