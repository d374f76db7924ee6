use std::sync::Arc;

use chrono::Utc;

use riskgov_core::config::LibraryConfig;
use riskgov_core::errors::{AdminError, RiskGovError};
use riskgov_core::models::{
    LibraryItemType, Organization, OrganizationStatus, Role, SeedItem, SessionContext,
};
use riskgov_core::traits::IAdminStorage;
use riskgov_library::LibraryGenerator;
use riskgov_storage::StorageEngine;

struct Setup {
    generator: LibraryGenerator,
    org: String,
    admin: SessionContext,
}

fn setup(config: LibraryConfig) -> Setup {
    let engine = Arc::new(StorageEngine::open_in_memory().unwrap());
    let org = Organization {
        id: riskgov_core::new_id(),
        name: "Acme Bank".to_string(),
        industry: Some("banking".to_string()),
        status: OrganizationStatus::Active,
        created_at: Utc::now(),
    };
    engine.create_organization(&org, "root").unwrap();
    let generator = LibraryGenerator::new(engine.clone(), engine, config);

    let root = SessionContext::new("root", "platform", Role::SuperAdmin);
    let catalog: Vec<SeedItem> = test_fixtures::load_fixture(test_fixtures::SEED_CATALOG);
    generator.load_catalog(&root, &catalog).unwrap();

    Setup {
        generator,
        admin: SessionContext::new("user-admin", org.id.clone(), Role::PrimaryAdmin),
        org: org.id,
    }
}

#[test]
fn generation_upserts_and_logs_counts() {
    let s = setup(LibraryConfig::default());
    let log = s
        .generator
        .generate(&s.admin, &s.org, &["Operational".to_string()])
        .unwrap();
    assert_eq!(log.counts.root_cause, 3);
    assert_eq!(log.counts.impact, 2);
    assert_eq!(log.counts.control, 2);
    assert_eq!(log.counts.kri, 3);
    assert_eq!(log.counts.kci, 1);
    assert_eq!(log.industry.as_deref(), Some("banking"));
    assert_eq!(log.categories, vec!["Operational".to_string()]);

    for item_type in LibraryItemType::ALL {
        let items = s.generator.list_items(&s.admin, &s.org, item_type).unwrap();
        assert_eq!(items.len() as u32, log.counts.get(item_type), "{item_type}");
    }
}

#[test]
fn rerun_is_idempotent_for_library_tables() {
    let s = setup(LibraryConfig::default());
    let cats = vec!["Operational".to_string(), " operational ".to_string()];
    let first = s.generator.generate(&s.admin, &s.org, &cats).unwrap();
    assert_eq!(first.categories.len(), 1);
    let before = s
        .generator
        .list_items(&s.admin, &s.org, LibraryItemType::Kri)
        .unwrap();

    s.generator.generate(&s.admin, &s.org, &cats).unwrap();
    let after = s
        .generator
        .list_items(&s.admin, &s.org, LibraryItemType::Kri)
        .unwrap();
    let codes = |items: &[riskgov_core::models::LibraryItem]| {
        items.iter().map(|i| i.code.clone()).collect::<Vec<_>>()
    };
    assert_eq!(codes(&before), codes(&after));
    assert_eq!(s.generator.list_runs(&s.admin, &s.org).unwrap().len(), 2);
}

#[test]
fn industry_matching_can_be_disabled() {
    let s = setup(LibraryConfig {
        match_industry_tags: false,
    });
    let log = s
        .generator
        .generate(&s.admin, &s.org, &["Operational".to_string()])
        .unwrap();
    assert_eq!(log.counts.total(), 6);
}

#[test]
fn empty_selection_is_rejected() {
    let s = setup(LibraryConfig::default());
    let err = s
        .generator
        .generate(&s.admin, &s.org, &["  ".to_string()])
        .unwrap_err();
    assert!(matches!(err, RiskGovError::ValidationError { .. }));
    assert!(s.generator.list_runs(&s.admin, &s.org).unwrap().is_empty());
}

#[test]
fn viewers_cannot_generate_or_load_catalog() {
    let s = setup(LibraryConfig::default());
    let viewer = SessionContext::new("user-viewer", s.org.clone(), Role::Viewer);
    let err = s
        .generator
        .generate(&viewer, &s.org, &["Operational".to_string()])
        .unwrap_err();
    assert!(matches!(err, RiskGovError::AdminError(AdminError::PermissionDenied { .. })));
    assert!(s.generator.load_catalog(&s.admin, &[]).is_err());
}
