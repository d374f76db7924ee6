use chrono::NaiveDate;

use crate::errors::{GovernanceError, RiskGovError, RiskGovResult};
use crate::models::{AppetiteStatement, DeleteCheck, StatementStatus};

/// Only DRAFT statements may be hard-deleted. Their appetite categories go
/// with them, so a tolerance metric on any of those categories blocks it.
pub fn statement_delete_check(statement: &AppetiteStatement, dependent_metrics: usize) -> DeleteCheck {
    match statement.status {
        StatementStatus::Draft if dependent_metrics > 0 => DeleteCheck::deny(format!(
            "{dependent_metrics} tolerance metric(s) reference its appetite categories"
        )),
        StatementStatus::Draft => DeleteCheck::allow(),
        StatementStatus::Approved => DeleteCheck::deny("cannot delete approved statement"),
        StatementStatus::Superseded => DeleteCheck::deny("cannot delete superseded statement"),
    }
}

/// Text and effective date may change only while DRAFT.
pub fn ensure_statement_editable(statement: &AppetiteStatement) -> RiskGovResult<()> {
    match statement.status {
        StatementStatus::Draft => Ok(()),
        StatementStatus::Approved => Err(GovernanceError::violation(format!(
            "statement v{} is APPROVED; supersede it to make changes",
            statement.version
        ))
        .into()),
        StatementStatus::Superseded => Err(GovernanceError::violation(format!(
            "statement v{} is SUPERSEDED and immutable",
            statement.version
        ))
        .into()),
    }
}

/// A new version may not be opened next to an APPROVED one.
pub fn ensure_can_create_statement(approved: Option<&AppetiteStatement>) -> RiskGovResult<()> {
    match approved {
        None => Ok(()),
        Some(current) => Err(GovernanceError::violation(format!(
            "statement v{} is APPROVED; supersede it instead of creating a new version",
            current.version
        ))
        .into()),
    }
}

/// DRAFT → APPROVED.
///
/// `approved` is the organization's currently APPROVED statement, if any.
pub fn ensure_can_approve(
    statement: &AppetiteStatement,
    approver_id: &str,
    approved: Option<&AppetiteStatement>,
    allow_self_approval: bool,
) -> RiskGovResult<()> {
    if approver_id.trim().is_empty() {
        return Err(RiskGovError::validation("approver_id", "approver is required"));
    }
    if statement.status != StatementStatus::Draft {
        return Err(GovernanceError::violation(format!(
            "only DRAFT statements can be approved; v{} is {}",
            statement.version, statement.status
        ))
        .into());
    }
    if let Some(current) = approved.filter(|a| a.id != statement.id) {
        return Err(GovernanceError::violation(format!(
            "organization already has approved statement v{}",
            current.version
        ))
        .into());
    }
    if !allow_self_approval && statement.created_by == approver_id {
        return Err(GovernanceError::violation(
            "statement creator may not approve their own statement",
        )
        .into());
    }
    Ok(())
}

/// APPROVED → SUPERSEDED (with a DRAFT successor).
pub fn ensure_can_supersede_statement(
    statement: &AppetiteStatement,
    new_effective_from: NaiveDate,
) -> RiskGovResult<()> {
    if statement.status != StatementStatus::Approved {
        return Err(GovernanceError::violation(format!(
            "only APPROVED statements can be superseded; v{} is {}",
            statement.version, statement.status
        ))
        .into());
    }
    if new_effective_from < statement.effective_from {
        return Err(RiskGovError::validation(
            "new_effective_from",
            format!(
                "must not precede the current effective date {}",
                statement.effective_from
            ),
        ));
    }
    Ok(())
}
