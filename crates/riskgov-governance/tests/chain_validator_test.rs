mod common;

use std::sync::Arc;

use common::*;
use riskgov_core::errors::{GovernanceError, RiskGovError, RiskGovResult, StorageError};
use riskgov_core::models::{
    AppetiteCategory, AppetiteStatement, GapSeverity, MetricType, NewRiskCategory,
    RiskCategory, Role, SessionContext, ToleranceMetric,
};
use riskgov_core::traits::{IChainSource, ITaxonomyStorage};
use riskgov_governance::ChainValidator;

#[test]
fn three_category_completeness() {
    let h = Harness::new();
    h.taxonomy(&["A", "B", "C"]);
    let draft = h.draft("Test");

    // A has no appetite category at all.
    let b = h.category(&draft.id, "B");
    let c = h.category(&draft.id, "C");
    let result = h.chain.validate(&h.org).unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.checked_categories, 3);
    let a_gap = result.gaps.iter().find(|g| g.category_name == "A").unwrap();
    assert_eq!(a_gap.severity, GapSeverity::Critical);

    // All three have appetite; only A gets an active metric.
    let a = h.category(&draft.id, "A");
    h.active_metric(&a.id);
    let result = h.chain.validate(&h.org).unwrap();
    assert!(!result.is_valid);
    let names: Vec<&str> = result.gaps.iter().map(|g| g.category_name.as_str()).collect();
    assert_eq!(names, vec!["B", "C"]);
    assert!(result.gaps.iter().all(|g| g.severity != GapSeverity::Critical));

    h.active_metric(&b.id);
    h.active_metric(&c.id);
    let result = h.chain.validate(&h.org).unwrap();
    assert!(result.is_valid);
    assert!(result.gaps.is_empty());
    assert_eq!(result.statement_id.as_deref(), Some(draft.id.as_str()));
}

#[test]
fn inactive_metrics_are_a_medium_gap() {
    let h = Harness::new();
    h.taxonomy(&["Operational", "Credit"]);
    let draft = h.draft("Test");
    let ops = h.category(&draft.id, "Operational");
    h.category(&draft.id, "Credit");
    h.metric(&ops.id, MetricType::Maximum, None);

    let result = h.chain.validate(&h.org).unwrap();
    let by_name = |n: &str| result.gaps.iter().find(|g| g.category_name == n).unwrap().severity;
    assert_eq!(by_name("Operational"), GapSeverity::Medium);
    assert_eq!(by_name("Credit"), GapSeverity::High);
}

#[test]
fn names_match_ignoring_case_and_whitespace() {
    let h = Harness::new();
    h.taxonomy(&["Operational Risk"]);
    let draft = h.draft("Test");
    let cat = h.category(&draft.id, "  operational RISK ");
    h.active_metric(&cat.id);
    assert!(h.chain.validate(&h.org).unwrap().is_valid);
}

#[test]
fn empty_taxonomy_is_vacuously_valid() {
    let h = Harness::new();
    let result = h.chain.validate(&h.org).unwrap();
    assert!(result.is_valid);
    assert_eq!(result.checked_categories, 0);
    assert_eq!(result.statement_id, None);
}

#[test]
fn without_a_statement_every_category_is_critical() {
    let h = Harness::new();
    h.taxonomy(&["Operational", "Credit"]);
    let result = h.chain.validate(&h.org).unwrap();
    assert_eq!(result.critical_gaps().count(), 2);
}

#[test]
fn active_statement_follows_the_lifecycle() {
    let h = Harness::new();
    h.taxonomy(&["Operational"]);
    let v1 = h.approved("Test");
    let outcome = h
        .appetite
        .supersede_statement(&h.approver, &v1.id, tomorrow())
        .unwrap();
    // Only the DRAFT successor remains: it is the active statement.
    let result = h.chain.validate(&h.org).unwrap();
    assert_eq!(result.statement_id.as_deref(), Some(outcome.successor.id.as_str()));

    h.appetite
        .approve_statement(&h.approver, &outcome.successor.id)
        .unwrap();
    let result = h.chain.validate(&h.org).unwrap();
    assert_eq!(result.statement_id.as_deref(), Some(outcome.successor.id.as_str()));
}

#[test]
fn banking_fixture_taxonomy_reports_every_node() {
    let h = Harness::new();
    let fixture = test_fixtures::load_taxonomy("banking");
    let mut ids: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for node in &fixture.categories {
        let parent_id = node.parent.as_ref().map(|p| ids.get(p).cloned().unwrap());
        let created = h
            .engine
            .create_risk_category(
                &NewRiskCategory {
                    organization_id: h.org.clone(),
                    name: node.name.clone(),
                    parent_id,
                    description: node.description.clone(),
                },
                "user-editor",
            )
            .unwrap();
        ids.insert(node.name.clone(), created.id);
    }
    let result = h.chain.validate(&h.org).unwrap();
    assert_eq!(result.checked_categories as usize, fixture.categories.len());
    assert_eq!(result.gaps.len(), fixture.categories.len());
}

#[test]
fn validation_is_role_checked() {
    let h = Harness::new();
    let outsider = SessionContext::new("u", "elsewhere", Role::PrimaryAdmin);
    assert!(h.chain.validate_for(&outsider, &h.org).is_err());
    let viewer = SessionContext::new("v", h.org.clone(), Role::Viewer);
    assert!(h.chain.validate_for(&viewer, &h.org).unwrap().is_valid);
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILING SOURCE
// ═══════════════════════════════════════════════════════════════════════════

/// A source whose metric fetch always fails.
struct BrokenMetrics;

impl IChainSource for BrokenMetrics {
    fn risk_categories(&self, organization_id: &str) -> RiskGovResult<Vec<RiskCategory>> {
        Ok(vec![RiskCategory {
            id: "rc-1".to_string(),
            organization_id: organization_id.to_string(),
            name: "Operational".to_string(),
            parent_id: None,
            description: String::new(),
            created_at: chrono::Utc::now(),
        }])
    }

    fn active_statement(&self, _: &str) -> RiskGovResult<Option<AppetiteStatement>> {
        Ok(None)
    }

    fn appetite_categories(&self, _: &str) -> RiskGovResult<Vec<AppetiteCategory>> {
        Ok(Vec::new())
    }

    fn tolerance_metrics(&self, _: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
        Err(StorageError::SqliteError {
            message: "disk I/O error".to_string(),
        }
        .into())
    }
}

#[test]
fn fetch_failure_is_unavailable_not_valid() {
    let validator = ChainValidator::new(Arc::new(BrokenMetrics));
    match validator.validate("org-1").unwrap_err() {
        RiskGovError::GovernanceError(GovernanceError::ChainValidationUnavailable {
            organization_id,
            reason,
        }) => {
            assert_eq!(organization_id, "org-1");
            assert!(reason.contains("tolerance metrics"), "{reason}");
            assert!(reason.contains("disk I/O error"), "{reason}");
        }
        other => panic!("expected ChainValidationUnavailable, got {other:?}"),
    }
}
