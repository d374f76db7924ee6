use crate::errors::{GovernanceError, RiskGovResult};
use crate::models::{AppetiteStatement, DeleteCheck, StatementStatus};

/// An appetite category is deletable only under a DRAFT statement and only
/// when no tolerance metric references it.
pub fn category_delete_check(parent: &AppetiteStatement, dependent_metrics: usize) -> DeleteCheck {
    if parent.status != StatementStatus::Draft {
        return DeleteCheck::deny(format!("parent statement is {}", parent.status));
    }
    if dependent_metrics > 0 {
        return DeleteCheck::deny(format!(
            "{dependent_metrics} tolerance metric(s) reference this category"
        ));
    }
    DeleteCheck::allow()
}

/// Categories lock together with their parent statement.
pub fn ensure_category_editable(parent: &AppetiteStatement) -> RiskGovResult<()> {
    if parent.status != StatementStatus::Draft {
        return Err(GovernanceError::violation(format!(
            "appetite categories are locked: parent statement is {}",
            parent.status
        ))
        .into());
    }
    Ok(())
}
