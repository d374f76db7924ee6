//! Tolerance metric lifecycle: create, activate, deactivate, supersede, delete.

mod common;

use common::*;
use proptest::prelude::*;

use riskgov_core::errors::{GovernanceError, RiskGovError};
use riskgov_core::models::{MetricLifecycle, MetricType, ToleranceMetricEdit, ToleranceStatus};
use riskgov_core::traits::IToleranceStorage;
use riskgov_storage::StorageEngine;

fn setup() -> (StorageEngine, String, String) {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let statement = draft(&engine, &org);
    let credit = category(&engine, &statement.id, "Credit");
    (engine, org, credit.id)
}

fn metric_type_strategy() -> impl Strategy<Value = MetricType> {
    prop::sample::select(MetricType::ALL.to_vec())
}

// ═══════════════════════════════════════════════════════════════════════════
// CREATE / EDIT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn new_metrics_start_inactive_version_one() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Maximum, Some("kri-1"));
    assert!(!m.is_active);
    assert!(m.never_activated);
    assert_eq!(m.version, 1);
    assert_eq!(m.lifecycle(), MetricLifecycle::Inactive);
}

#[test]
fn create_against_unknown_category_is_not_found() {
    let (engine, org, _) = setup();
    let err = engine
        .create_metric(&new_metric(&org, "missing", MetricType::Maximum, None), ACTOR)
        .unwrap_err();
    assert!(matches!(err, RiskGovError::NotFound { .. }));
}

#[test]
fn edit_allowed_only_before_activation() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Maximum, None);
    let edit = ToleranceMetricEdit {
        name: "Loss events".to_string(),
        description: m.description.clone(),
        metric_type: m.metric_type,
        unit: "count".to_string(),
        materiality_type: m.materiality_type,
        thresholds: m.thresholds,
        kri_id: Some("kri-9".to_string()),
        effective_from: m.effective_from,
    };
    let edited = engine.update_metric(&m.id, &edit, m.row_version, ACTOR).unwrap();
    assert_eq!(edited.name, "Loss events");
    assert_eq!(edited.kri_id.as_deref(), Some("kri-9"));

    let active = engine.activate_metric(&m.id, ACTOR).unwrap();
    let err = engine
        .update_metric(&m.id, &edit, active.row_version, ACTOR)
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::GovernanceViolation { .. })
    ));
}

#[test]
fn stale_edit_is_a_concurrent_modification() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Maximum, None);
    let edit = ToleranceMetricEdit {
        name: "renamed".to_string(),
        description: String::new(),
        metric_type: m.metric_type,
        unit: m.unit.clone(),
        materiality_type: m.materiality_type,
        thresholds: m.thresholds,
        kri_id: None,
        effective_from: m.effective_from,
    };
    engine.update_metric(&m.id, &edit, m.row_version, ACTOR).unwrap();
    let err = engine
        .update_metric(&m.id, &edit, m.row_version, ACTOR)
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::GovernanceError(GovernanceError::ConcurrentModification { .. })
    ));
}

// ═══════════════════════════════════════════════════════════════════════════
// ACTIVATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn activation_records_actor_and_clears_never_activated() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Minimum, Some("kri-1"));
    let active = engine.activate_metric(&m.id, "risk-owner").unwrap();
    assert!(active.is_active);
    assert!(!active.never_activated);
    assert_eq!(active.activated_by.as_deref(), Some("risk-owner"));
    assert!(active.activated_at.is_some());
}

#[test]
fn deactivation_closes_metric_for_good() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Maximum, Some("kri-1"));
    engine.activate_metric(&m.id, ACTOR).unwrap();
    let closed = engine.deactivate_metric(&m.id, ACTOR).unwrap();

    assert!(!closed.is_active);
    assert_eq!(closed.effective_to, Some(today()));
    assert_eq!(closed.lifecycle(), MetricLifecycle::Historical);

    assert!(engine.activate_metric(&m.id, ACTOR).is_err());
    assert!(engine.deactivate_metric(&m.id, ACTOR).is_err());
    let check = engine.can_delete_tolerance_metric(&m.id).unwrap();
    assert!(!check.allowed);
}

// ═══════════════════════════════════════════════════════════════════════════
// SUPERSEDE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn supersede_requires_active_metric() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Maximum, Some("kri-1"));
    assert!(engine.supersede_metric(&m.id, tomorrow(), ACTOR).is_err());
}

#[test]
fn history_follows_previous_version_links() {
    let (engine, org, cat) = setup();
    let v1 = metric(&engine, &org, &cat, MetricType::Maximum, Some("kri-1"));
    engine.activate_metric(&v1.id, ACTOR).unwrap();
    let v2 = engine.supersede_metric(&v1.id, tomorrow(), ACTOR).unwrap().successor;
    engine.activate_metric(&v2.id, ACTOR).unwrap();
    let v3 = engine.supersede_metric(&v2.id, tomorrow(), ACTOR).unwrap().successor;

    let history = engine.metric_history(&v3.id).unwrap();
    let versions: Vec<u32> = history.iter().map(|m| m.version).collect();
    assert_eq!(versions, vec![1, 2, 3]);
    assert_eq!(history[0].id, v1.id);
}

#[test]
fn classify_reads_stored_thresholds() {
    let (engine, org, cat) = setup();
    let m = metric(&engine, &org, &cat, MetricType::Maximum, None);
    let stored = engine.get_metric(&m.id).unwrap().unwrap();
    assert_eq!(stored.classify(3.0), Some(ToleranceStatus::Green));
    assert_eq!(stored.classify(7.5), Some(ToleranceStatus::Amber));
    assert_eq!(stored.classify(12.0), Some(ToleranceStatus::Red));
}

// ═══════════════════════════════════════════════════════════════════════════
// PROPERTIES
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_activation_requires_kri(metric_type in metric_type_strategy()) {
        let (engine, org, cat) = setup();
        let m = metric(&engine, &org, &cat, metric_type, None);

        let err = engine.activate_metric(&m.id, ACTOR).unwrap_err();
        let missing_kri = matches!(
            err,
            RiskGovError::GovernanceError(GovernanceError::MissingKriLink { .. })
        );
        prop_assert!(missing_kri);

        let unchanged = engine.get_metric(&m.id).unwrap().unwrap();
        prop_assert!(!unchanged.is_active);
        prop_assert!(unchanged.never_activated);
    }

    #[test]
    fn prop_deletable_iff_never_activated(metric_type in metric_type_strategy(), activate in any::<bool>()) {
        let (engine, org, cat) = setup();
        let m = metric(&engine, &org, &cat, metric_type, Some("kri-1"));
        prop_assert!(engine.can_delete_tolerance_metric(&m.id).unwrap().allowed);

        if activate {
            engine.activate_metric(&m.id, ACTOR).unwrap();
            prop_assert!(!engine.can_delete_tolerance_metric(&m.id).unwrap().allowed);
            engine.deactivate_metric(&m.id, ACTOR).unwrap();
            // Activate → deactivate leaves the metric permanently non-deletable.
            prop_assert!(!engine.can_delete_tolerance_metric(&m.id).unwrap().allowed);
            prop_assert!(engine.delete_metric(&m.id, ACTOR).is_err());
        } else {
            engine.delete_metric(&m.id, ACTOR).unwrap();
            prop_assert!(engine.get_metric(&m.id).unwrap().is_none());
        }
    }

    #[test]
    fn prop_supersede_preserves_thresholds(metric_type in metric_type_strategy()) {
        let (engine, org, cat) = setup();
        let m = metric(&engine, &org, &cat, metric_type, Some("kri-1"));
        engine.activate_metric(&m.id, ACTOR).unwrap();

        let result = engine.supersede_metric(&m.id, tomorrow(), ACTOR).unwrap();
        let successor = result.successor;
        prop_assert_eq!(successor.thresholds, m.thresholds);
        prop_assert_eq!(successor.metric_type, m.metric_type);
        prop_assert_eq!(successor.kri_id.as_deref(), Some("kri-1"));
        prop_assert_eq!(successor.version, m.version + 1);
        prop_assert_eq!(successor.previous_version_id.as_deref(), Some(m.id.as_str()));
        prop_assert!(!successor.is_active);
        prop_assert!(successor.never_activated);
        prop_assert_eq!(successor.effective_from, tomorrow());

        prop_assert!(!result.superseded.is_active);
        prop_assert_eq!(result.superseded.effective_to, Some(today()));
    }
}
