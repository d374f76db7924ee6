//! Appetite statement and category lifecycle against an in-memory engine.

mod common;

use common::*;
use riskgov_core::errors::{GovernanceError, RiskGovError};
use riskgov_core::models::{AppetiteLevel, MetricType, StatementStatus};
use riskgov_core::traits::{IAppetiteStorage, IChainSource};
use riskgov_storage::StorageEngine;

// ═══════════════════════════════════════════════════════════════════════════
// CREATE / UPDATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn create_assigns_incrementing_versions_as_draft() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");

    let v1 = draft(&engine, &org);
    let v2 = draft(&engine, &org);

    assert_eq!(v1.version, 1);
    assert_eq!(v2.version, 2);
    assert_eq!(v1.status, StatementStatus::Draft);
    assert!(v1.approved_by.is_none());
}

#[test]
fn create_refused_while_a_statement_is_approved() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    engine.approve_statement(&v1.id, "cro", true).unwrap();

    let err = engine
        .create_statement(&riskgov_core::models::NewStatement {
            organization_id: org.clone(),
            statement_text: "another".to_string(),
            effective_from: today(),
            created_by: ACTOR.to_string(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::GovernanceViolation { .. })
    ));
}

#[test]
fn create_for_unknown_organization_is_not_found() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let err = engine
        .create_statement(&riskgov_core::models::NewStatement {
            organization_id: "missing".to_string(),
            statement_text: "text".to_string(),
            effective_from: today(),
            created_by: ACTOR.to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, RiskGovError::NotFound { .. }));
}

#[test]
fn update_uses_row_version_compare_and_swap() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);

    let updated = engine
        .update_statement(&v1.id, "revised text", tomorrow(), v1.row_version, ACTOR)
        .unwrap();
    assert_eq!(updated.statement_text, "revised text");
    assert_eq!(updated.row_version, v1.row_version + 1);

    // Stale row version is rejected.
    let err = engine
        .update_statement(&v1.id, "lost update", today(), v1.row_version, ACTOR)
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::ConcurrentModification { .. })
    ));
    let current = engine.get_statement(&v1.id).unwrap().unwrap();
    assert_eq!(current.statement_text, "revised text");
}

#[test]
fn approved_statement_is_not_editable() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let approved = engine.approve_statement(&v1.id, "cro", true).unwrap();

    let err = engine
        .update_statement(&v1.id, "edit", today(), approved.row_version, ACTOR)
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::GovernanceViolation { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// APPROVAL
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn approve_sets_approver_and_timestamp() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);

    let approved = engine.approve_statement(&v1.id, "cro", true).unwrap();
    assert_eq!(approved.status, StatementStatus::Approved);
    assert_eq!(approved.approved_by.as_deref(), Some("cro"));
    assert!(approved.approved_at.is_some());
}

#[test]
fn no_double_approval_per_organization() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let v2 = draft(&engine, &org);

    engine.approve_statement(&v1.id, "cro", true).unwrap();
    let err = engine.approve_statement(&v2.id, "cro", true).unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::GovernanceViolation { .. })
    ));

    let approved: Vec<_> = engine
        .list_statements(&org)
        .unwrap()
        .into_iter()
        .filter(|s| s.status == StatementStatus::Approved)
        .collect();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].id, v1.id);
}

#[test]
fn approving_twice_is_a_violation() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    engine.approve_statement(&v1.id, "cro", true).unwrap();
    assert!(engine.approve_statement(&v1.id, "cro", true).is_err());
}

#[test]
fn blank_approver_is_a_validation_error() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let err = engine.approve_statement(&v1.id, "  ", true).unwrap_err();
    assert!(matches!(err, RiskGovError::ValidationError { .. }));
}

#[test]
fn self_approval_can_be_disallowed() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);

    assert!(engine.approve_statement(&v1.id, ACTOR, false).is_err());
    assert!(engine.approve_statement(&v1.id, ACTOR, true).is_ok());
}

#[test]
fn approvals_are_independent_across_organizations() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = seed_org(&engine, "Bank A");
    let b = seed_org(&engine, "Bank B");
    let sa = draft(&engine, &a);
    let sb = draft(&engine, &b);
    engine.approve_statement(&sa.id, "cro", true).unwrap();
    engine.approve_statement(&sb.id, "cro", true).unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════
// END TO END: approve → delete refused → supersede
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn approve_then_supersede_end_to_end() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let credit = category(&engine, &v1.id, "Credit");
    let market = category(&engine, &v1.id, "Market");

    engine.approve_statement(&v1.id, "cro", true).unwrap();

    let err = engine.delete_statement(&v1.id, ACTOR).unwrap_err();
    match err {
        RiskGovError::GovernanceError(GovernanceError::CannotDelete { reason, .. }) => {
            assert!(reason.contains("cannot delete approved"), "reason: {reason}");
        }
        other => panic!("expected CannotDelete, got {other:?}"),
    }

    let result = engine.supersede_statement(&v1.id, tomorrow(), ACTOR).unwrap();
    assert_eq!(result.superseded.status, StatementStatus::Superseded);
    assert_eq!(result.superseded.superseded_by.as_deref(), Some(result.successor.id.as_str()));
    assert_eq!(result.successor.status, StatementStatus::Draft);
    assert_eq!(result.successor.version, 2);
    assert_eq!(result.successor.effective_from, tomorrow());
    assert_eq!(result.successor.statement_text, v1.statement_text);

    let moved = engine.list_categories(&result.successor.id).unwrap();
    let mut moved_ids: Vec<_> = moved.iter().map(|c| c.id.clone()).collect();
    moved_ids.sort();
    let mut expected = vec![credit.id, market.id];
    expected.sort();
    assert_eq!(moved_ids, expected);
    assert!(engine.list_categories(&v1.id).unwrap().is_empty());

    // Successor is the active statement and may be approved.
    let active = engine.active_statement(&org).unwrap().unwrap();
    assert_eq!(active.id, result.successor.id);
    engine.approve_statement(&result.successor.id, "cro", true).unwrap();
}

#[test]
fn supersede_requires_approved_status() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    assert!(engine.supersede_statement(&v1.id, tomorrow(), ACTOR).is_err());
}

#[test]
fn supersede_rejects_earlier_effective_date_and_changes_nothing() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    category(&engine, &v1.id, "Credit");
    engine.approve_statement(&v1.id, "cro", true).unwrap();

    let yesterday = today() - chrono::Duration::days(1);
    let err = engine.supersede_statement(&v1.id, yesterday, ACTOR).unwrap_err();
    assert!(matches!(err, RiskGovError::ValidationError { .. }));

    let statements = engine.list_statements(&org).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].status, StatementStatus::Approved);
    assert_eq!(engine.list_categories(&v1.id).unwrap().len(), 1);
}

// ═══════════════════════════════════════════════════════════════════════════
// DELETE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn draft_delete_cascades_categories() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let credit = category(&engine, &v1.id, "Credit");

    assert!(engine.can_delete_statement(&v1.id).unwrap().allowed);
    engine.delete_statement(&v1.id, ACTOR).unwrap();
    assert!(engine.get_statement(&v1.id).unwrap().is_none());
    assert!(engine.get_category(&credit.id).unwrap().is_none());
}

#[test]
fn draft_with_metrics_is_not_deletable() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let credit = category(&engine, &v1.id, "Credit");
    metric(&engine, &org, &credit.id, MetricType::Maximum, None);

    let check = engine.can_delete_statement(&v1.id).unwrap();
    assert!(!check.allowed);
    assert!(check.reason.unwrap().contains("tolerance metric"));
}

#[test]
fn superseded_statement_is_not_deletable() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    engine.approve_statement(&v1.id, "cro", true).unwrap();
    engine.supersede_statement(&v1.id, tomorrow(), ACTOR).unwrap();

    let check = engine.can_delete_statement(&v1.id).unwrap();
    assert!(!check.allowed);
    assert_eq!(check.reason.as_deref(), Some("cannot delete superseded statement"));
}

// ═══════════════════════════════════════════════════════════════════════════
// APPETITE CATEGORIES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn category_names_unique_within_statement_ignoring_case() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    category(&engine, &v1.id, "Credit");

    let err = engine
        .create_category(
            &riskgov_core::models::NewAppetiteCategory {
                statement_id: v1.id.clone(),
                category_name: "credit".to_string(),
                appetite_level: AppetiteLevel::Low,
                rationale: String::new(),
            },
            ACTOR,
        )
        .unwrap_err();
    assert!(matches!(err, RiskGovError::AdminError(_)));
}

#[test]
fn category_deletability_mirrors_parent_draft_status() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let credit = category(&engine, &v1.id, "Credit");

    // DRAFT parent, no metrics.
    assert!(engine.can_delete_appetite_category(&credit.id).unwrap().allowed);

    engine.approve_statement(&v1.id, "cro", true).unwrap();
    let check = engine.can_delete_appetite_category(&credit.id).unwrap();
    assert!(!check.allowed);
    assert_eq!(check.reason.as_deref(), Some("parent statement is APPROVED"));

    // After supersede the category belongs to the new DRAFT and is deletable again.
    let result = engine.supersede_statement(&v1.id, tomorrow(), ACTOR).unwrap();
    let moved = engine.get_category(&credit.id).unwrap().unwrap();
    assert_eq!(moved.statement_id, result.successor.id);
    assert!(engine.can_delete_appetite_category(&credit.id).unwrap().allowed);
    engine.delete_category(&credit.id, ACTOR).unwrap();
}

#[test]
fn category_with_metrics_reports_reference_count() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let credit = category(&engine, &v1.id, "Credit");
    metric(&engine, &org, &credit.id, MetricType::Maximum, None);
    metric(&engine, &org, &credit.id, MetricType::Minimum, None);

    let err = engine.delete_category(&credit.id, ACTOR).unwrap_err();
    match err {
        RiskGovError::GovernanceError(GovernanceError::CannotDelete { reason, .. }) => {
            assert_eq!(reason, "2 tolerance metric(s) reference this category");
        }
        other => panic!("expected CannotDelete, got {other:?}"),
    }
}

#[test]
fn category_update_locked_once_parent_approved() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    let credit = category(&engine, &v1.id, "Credit");

    let updated = engine
        .update_category(&credit.id, AppetiteLevel::Low, "tighter", ACTOR)
        .unwrap();
    assert_eq!(updated.appetite_level, AppetiteLevel::Low);

    engine.approve_statement(&v1.id, "cro", true).unwrap();
    assert!(engine
        .update_category(&credit.id, AppetiteLevel::High, "looser", ACTOR)
        .is_err());
}

#[test]
fn category_can_be_added_under_approved_statement() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let v1 = draft(&engine, &org);
    category(&engine, &v1.id, "Credit");
    engine.approve_statement(&v1.id, "cro", true).unwrap();

    let market = category(&engine, &v1.id, "Market");
    assert_eq!(market.statement_id, v1.id);
    let names: Vec<String> = engine
        .list_categories(&v1.id)
        .unwrap()
        .into_iter()
        .map(|c| c.category_name)
        .collect();
    assert!(names.contains(&"Market".to_string()));

    // Existing levels stay locked.
    assert!(engine
        .update_category(&market.id, AppetiteLevel::High, "looser", ACTOR)
        .is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// ACTIVE STATEMENT SELECTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn active_statement_prefers_approved_then_newest_draft() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    assert!(engine.active_statement(&org).unwrap().is_none());

    let v1 = draft(&engine, &org);
    let v2 = draft(&engine, &org);
    assert_eq!(engine.active_statement(&org).unwrap().unwrap().id, v2.id);

    engine.approve_statement(&v1.id, "cro", true).unwrap();
    assert_eq!(engine.active_statement(&org).unwrap().unwrap().id, v1.id);
}
