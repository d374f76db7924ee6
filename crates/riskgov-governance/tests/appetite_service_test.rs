mod common;

use common::*;
use riskgov_core::config::GovernanceConfig;
use riskgov_core::errors::{AdminError, GovernanceError, RiskGovError};
use riskgov_core::models::{AppetiteLevel, Role, SessionContext, StatementStatus};
use riskgov_core::traits::IAppetiteStorage;

fn is_violation(err: &RiskGovError) -> bool {
    matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::GovernanceViolation { .. })
    )
}

fn is_denied(err: &RiskGovError) -> bool {
    matches!(err, RiskGovError::AdminError(AdminError::PermissionDenied { .. }))
}

// ═══════════════════════════════════════════════════════════════════════════
// END-TO-END
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn approve_then_supersede_moves_categories() {
    let h = Harness::new();
    let v1 = h.draft("Test");
    let ops = h.category(&v1.id, "Operational");
    let credit = h.category(&v1.id, "Credit");

    let approved = h.appetite.approve_statement(&h.approver, &v1.id).unwrap();
    assert_eq!(approved.status, StatementStatus::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("user-approver"));

    let err = h.appetite.delete_statement(&h.editor, &v1.id).unwrap_err();
    match err {
        RiskGovError::GovernanceError(GovernanceError::CannotDelete { reason, .. }) => {
            assert!(reason.contains("cannot delete approved"), "{reason}");
        }
        other => panic!("expected CannotDelete, got {other:?}"),
    }

    let outcome = h
        .appetite
        .supersede_statement(&h.approver, &v1.id, tomorrow())
        .unwrap();
    assert_eq!(outcome.superseded.status, StatementStatus::Superseded);
    assert_eq!(outcome.superseded.superseded_by.as_deref(), Some(outcome.successor.id.as_str()));
    assert_eq!(outcome.successor.status, StatementStatus::Draft);
    assert_eq!(outcome.successor.version, 2);
    assert_eq!(outcome.successor.statement_text, "Test");
    assert_eq!(outcome.successor.effective_from, tomorrow());

    let moved = h.categories.list_categories(&h.editor, &outcome.successor.id).unwrap();
    let mut ids: Vec<_> = moved.iter().map(|c| c.id.clone()).collect();
    ids.sort();
    let mut expected = vec![ops.id, credit.id];
    expected.sort();
    assert_eq!(ids, expected);
    assert!(h.categories.list_categories(&h.editor, &v1.id).unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// INPUT VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn blank_text_is_rejected_before_any_write() {
    let h = Harness::new();
    let err = h
        .appetite
        .create_statement(&h.editor, &h.org, "   ", today())
        .unwrap_err();
    assert!(matches!(err, RiskGovError::ValidationError { .. }));
    assert!(h.engine.list_statements(&h.org).unwrap().is_empty());
}

#[test]
fn statement_text_is_trimmed() {
    let h = Harness::new();
    let draft = h.draft("  Low appetite for fraud.  ");
    assert_eq!(draft.statement_text, "Low appetite for fraud.");
}

#[test]
fn blank_category_name_is_rejected() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let err = h
        .categories
        .create_category(&h.editor, &draft.id, "  ", AppetiteLevel::Zero, "")
        .unwrap_err();
    assert!(matches!(err, RiskGovError::ValidationError { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// ROLES AND TENANCY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn secondary_admin_cannot_approve() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let err = h.appetite.approve_statement(&h.editor, &draft.id).unwrap_err();
    assert!(is_denied(&err));
    let stored = h.appetite.get_statement(&h.editor, &draft.id).unwrap();
    assert_eq!(stored.status, StatementStatus::Draft);
}

#[test]
fn viewer_reads_but_cannot_write() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let viewer = SessionContext::new("user-viewer", h.org.clone(), Role::Viewer);
    assert_eq!(h.appetite.list_statements(&viewer, &h.org).unwrap().len(), 1);
    assert!(is_denied(
        &h.appetite.create_statement(&viewer, &h.org, "x", today()).unwrap_err()
    ));
    assert!(is_denied(&h.appetite.delete_statement(&viewer, &draft.id).unwrap_err()));
}

#[test]
fn other_tenant_cannot_see_statements() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let outsider = SessionContext::new("user-x", "another-org", Role::PrimaryAdmin);
    assert!(is_denied(&h.appetite.get_statement(&outsider, &draft.id).unwrap_err()));
    assert!(is_denied(&h.appetite.list_statements(&outsider, &h.org).unwrap_err()));

    let root = SessionContext::new("root", "platform", Role::SuperAdmin);
    assert_eq!(h.appetite.list_statements(&root, &h.org).unwrap().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// LIFECYCLE RULES THROUGH THE SERVICE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn create_is_refused_while_approved_exists() {
    let h = Harness::new();
    h.approved("Test");
    let err = h
        .appetite
        .create_statement(&h.editor, &h.org, "Another", today())
        .unwrap_err();
    assert!(is_violation(&err));
}

#[test]
fn categories_can_be_added_to_the_approved_statement() {
    let h = Harness::new();
    let v1 = h.approved("Test");
    let credit = h
        .categories
        .create_category(&h.editor, &v1.id, "Credit", AppetiteLevel::Low, "")
        .unwrap();
    assert_eq!(credit.statement_id, v1.id);
    assert_eq!(h.engine.list_categories(&v1.id).unwrap().len(), 1);
}

#[test]
fn self_approval_follows_config() {
    let strict = Harness::with_config(GovernanceConfig {
        allow_self_approval: false,
    });
    let own = strict
        .appetite
        .create_statement(&strict.approver, &strict.org, "Test", today())
        .unwrap();
    let err = strict.appetite.approve_statement(&strict.approver, &own.id).unwrap_err();
    assert!(is_violation(&err));

    let lenient = Harness::new();
    let own = lenient
        .appetite
        .create_statement(&lenient.approver, &lenient.org, "Test", today())
        .unwrap();
    assert!(lenient.appetite.approve_statement(&lenient.approver, &own.id).is_ok());
}

#[test]
fn stale_row_version_is_a_concurrent_modification() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let edited = h
        .appetite
        .update_statement(&h.editor, &draft.id, "Edited", today(), draft.row_version)
        .unwrap();
    assert_eq!(edited.statement_text, "Edited");

    let err = h
        .appetite
        .update_statement(&h.editor, &draft.id, "Again", today(), draft.row_version)
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::ConcurrentModification { .. })
    ));
}

#[test]
fn supersede_requires_approved_statement() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let err = h
        .appetite
        .supersede_statement(&h.approver, &draft.id, tomorrow())
        .unwrap_err();
    assert!(is_violation(&err));
}

#[test]
fn unknown_statement_is_not_found() {
    let h = Harness::new();
    let err = h.appetite.approve_statement(&h.approver, "missing").unwrap_err();
    assert!(matches!(err, RiskGovError::NotFound { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// CATEGORIES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn category_delete_surfaces_reason_verbatim() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let cat = h.category(&draft.id, "Operational");
    h.metric(&cat.id, riskgov_core::models::MetricType::Maximum, None);

    let check = h.categories.can_delete_category(&h.editor, &cat.id).unwrap();
    assert!(!check.allowed);
    let reason = check.reason.unwrap();
    assert_eq!(reason, "1 tolerance metric(s) reference this category");

    match h.categories.delete_category(&h.editor, &cat.id).unwrap_err() {
        RiskGovError::GovernanceError(GovernanceError::CannotDelete { reason: got, .. }) => {
            assert_eq!(got, reason);
        }
        other => panic!("expected CannotDelete, got {other:?}"),
    }
}

#[test]
fn category_edits_lock_after_approval() {
    let h = Harness::new();
    let draft = h.draft("Test");
    let cat = h.category(&draft.id, "Operational");
    let updated = h
        .categories
        .update_category(&h.editor, &cat.id, AppetiteLevel::High, "growth market")
        .unwrap();
    assert_eq!(updated.appetite_level, AppetiteLevel::High);

    h.appetite.approve_statement(&h.approver, &draft.id).unwrap();
    let err = h
        .categories
        .update_category(&h.editor, &cat.id, AppetiteLevel::Zero, "")
        .unwrap_err();
    assert!(is_violation(&err));

    let check = h.categories.can_delete_category(&h.editor, &cat.id).unwrap();
    assert_eq!(check.reason.as_deref(), Some("parent statement is APPROVED"));
}
