//! Organizations, structure, invitations, users, regulators, taxonomy, and
//! library tables.

mod common;

use chrono::{Duration, Utc};

use common::*;
use riskgov_core::errors::{AdminError, RiskGovError};
use riskgov_core::models::{
    Department, Division, GenerationCounts, GenerationLog, InvitationStatus, LibraryItemType,
    NewRiskCategory, OrganizationStatus, Regulator, RegulatorAccess, Role, SeedItem,
    UserInvitation, UserProfile, UserStatus,
};
use riskgov_core::traits::{IAdminStorage, IAppetiteStorage, ILibraryStorage, ITaxonomyStorage};
use riskgov_storage::StorageEngine;

fn invitation(org: &str, email: &str, expires_in: Duration) -> UserInvitation {
    let now = Utc::now();
    UserInvitation {
        id: riskgov_core::new_id(),
        organization_id: org.to_string(),
        email: email.to_string(),
        role: Role::User,
        token: riskgov_core::new_id(),
        invited_by: ACTOR.to_string(),
        status: InvitationStatus::Pending,
        created_at: now,
        expires_at: now + expires_in,
        accepted_at: None,
    }
}

fn profile(org: &str, email: &str) -> UserProfile {
    UserProfile {
        id: riskgov_core::new_id(),
        organization_id: org.to_string(),
        email: email.to_string(),
        full_name: "Dana Analyst".to_string(),
        role: Role::User,
        status: UserStatus::PendingApproval,
        created_at: Utc::now(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ORGANIZATIONS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn organization_names_are_unique_ignoring_case() {
    let engine = StorageEngine::open_in_memory().unwrap();
    seed_org(&engine, "Acme Bank");
    let dup = riskgov_core::models::Organization {
        id: riskgov_core::new_id(),
        name: "ACME BANK".to_string(),
        industry: None,
        status: OrganizationStatus::Active,
        created_at: Utc::now(),
    };
    let err = engine.create_organization(&dup, ACTOR).unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::AdminError(AdminError::DuplicateName { .. })
    ));
    assert!(engine.find_organization_by_name("acme bank").unwrap().is_some());
}

#[test]
fn admin_listing_carries_counts() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    seed_org(&engine, "Beta Insurance");
    draft(&engine, &org);
    engine
        .create_invitation(&invitation(&org, "a@acme.test", Duration::days(7)))
        .unwrap();

    let summaries = engine.list_organizations_admin().unwrap();
    assert_eq!(summaries.len(), 2);
    let acme = &summaries[0];
    assert_eq!(acme.organization.name, "Acme Bank");
    assert_eq!(acme.statement_count, 1);
    assert_eq!(acme.pending_invitation_count, 1);
    assert_eq!(acme.user_count, 0);
    assert_eq!(summaries[1].statement_count, 0);
}

#[test]
fn suspend_and_reactivate_organization() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let suspended = engine
        .set_organization_status(&org, OrganizationStatus::Suspended, ACTOR)
        .unwrap();
    assert_eq!(suspended.status, OrganizationStatus::Suspended);
    let active = engine
        .set_organization_status(&org, OrganizationStatus::Active, ACTOR)
        .unwrap();
    assert_eq!(active.status, OrganizationStatus::Active);
}

// ═══════════════════════════════════════════════════════════════════════════
// STRUCTURE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn division_with_departments_cannot_be_deleted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let division = Division {
        id: riskgov_core::new_id(),
        organization_id: org.clone(),
        name: "Retail".to_string(),
        created_at: Utc::now(),
    };
    engine.create_division(&division, ACTOR).unwrap();
    let department = Department {
        id: riskgov_core::new_id(),
        organization_id: org.clone(),
        division_id: division.id.clone(),
        name: "Cards".to_string(),
        created_at: Utc::now(),
    };
    engine.create_department(&department, ACTOR).unwrap();

    let err = engine.delete_division(&division.id, ACTOR).unwrap_err();
    assert!(matches!(err, RiskGovError::AdminError(AdminError::InUse { .. })));

    assert_eq!(engine.list_departments(&org, Some(&division.id)).unwrap().len(), 1);
    engine.delete_department(&department.id, ACTOR).unwrap();
    engine.delete_division(&division.id, ACTOR).unwrap();
    assert!(engine.list_divisions(&org).unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// INVITATIONS / USERS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn accept_creates_pending_user_atomically() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let inv = invitation(&org, "dana@acme.test", Duration::days(7));
    engine.create_invitation(&inv).unwrap();

    let user = profile(&org, "dana@acme.test");
    let accepted = engine.accept_invitation(&inv.id, &user, Utc::now()).unwrap();
    assert_eq!(accepted.status, InvitationStatus::Accepted);
    assert!(accepted.accepted_at.is_some());

    let stored = engine.get_user(&user.id).unwrap().unwrap();
    assert_eq!(stored.status, UserStatus::PendingApproval);

    // Second accept is refused.
    let err = engine
        .accept_invitation(&inv.id, &profile(&org, "other@acme.test"), Utc::now())
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::AdminError(AdminError::InvitationNotPending { .. })
    ));
}

#[test]
fn expired_invitation_cannot_be_accepted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let inv = invitation(&org, "late@acme.test", Duration::seconds(-1));
    engine.create_invitation(&inv).unwrap();

    let err = engine
        .accept_invitation(&inv.id, &profile(&org, "late@acme.test"), Utc::now())
        .unwrap_err();
    assert!(matches!(
        err,
        RiskGovError::AdminError(AdminError::InvitationExpired { .. })
    ));
    assert!(engine.find_user_by_email(&org, "late@acme.test").unwrap().is_none());
}

#[test]
fn expire_sweep_only_touches_stale_pending() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    engine
        .create_invitation(&invitation(&org, "old@acme.test", Duration::seconds(-5)))
        .unwrap();
    engine
        .create_invitation(&invitation(&org, "new@acme.test", Duration::days(3)))
        .unwrap();

    assert_eq!(engine.expire_invitations(Utc::now()).unwrap(), 1);
    assert_eq!(engine.expire_invitations(Utc::now()).unwrap(), 0);
    let pending = engine
        .list_invitations(&org, Some(InvitationStatus::Pending))
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].email, "new@acme.test");
}

#[test]
fn user_status_transitions_are_persisted() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let inv = invitation(&org, "dana@acme.test", Duration::days(7));
    engine.create_invitation(&inv).unwrap();
    let user = profile(&org, "dana@acme.test");
    engine.accept_invitation(&inv.id, &user, Utc::now()).unwrap();

    engine.set_user_status(&user.id, UserStatus::Active, ACTOR).unwrap();
    let active = engine.list_users(&org, Some(UserStatus::Active)).unwrap();
    assert_eq!(active.len(), 1);
    assert!(engine
        .list_users(&org, Some(UserStatus::PendingApproval))
        .unwrap()
        .is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// REGULATORS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn regulator_access_grant_revoke_and_delete() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let regulator = Regulator {
        id: riskgov_core::new_id(),
        name: "Prudential Authority".to_string(),
        jurisdiction: "ZA".to_string(),
        contact_email: "supervision@pa.test".to_string(),
        created_at: Utc::now(),
    };
    engine.create_regulator(&regulator, "root").unwrap();
    engine
        .grant_regulator_access(&RegulatorAccess {
            regulator_id: regulator.id.clone(),
            organization_id: org.clone(),
            granted_by: ACTOR.to_string(),
            granted_at: Utc::now(),
            revoked_at: None,
        })
        .unwrap();

    assert_eq!(engine.list_regulators_for_organization(&org).unwrap().len(), 1);
    assert!(engine.delete_regulator(&regulator.id, "root").is_err());

    engine
        .revoke_regulator_access(&regulator.id, &org, ACTOR)
        .unwrap();
    assert!(engine.list_regulators_for_organization(&org).unwrap().is_empty());
    let grants = engine.list_regulator_access(&regulator.id).unwrap();
    assert_eq!(grants.len(), 1);
    assert!(!grants[0].is_active());

    engine.delete_regulator(&regulator.id, "root").unwrap();
    assert!(engine.get_regulator(&regulator.id).unwrap().is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// TAXONOMY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn taxonomy_parent_cannot_be_deleted_before_children() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let parent = engine
        .create_risk_category(
            &NewRiskCategory {
                organization_id: org.clone(),
                name: "Operational".to_string(),
                parent_id: None,
                description: String::new(),
            },
            ACTOR,
        )
        .unwrap();
    let child = engine
        .create_risk_category(
            &NewRiskCategory {
                organization_id: org.clone(),
                name: "Fraud".to_string(),
                parent_id: Some(parent.id.clone()),
                description: String::new(),
            },
            ACTOR,
        )
        .unwrap();

    assert!(engine.delete_risk_category(&parent.id, ACTOR).is_err());
    engine.delete_risk_category(&child.id, ACTOR).unwrap();
    engine.delete_risk_category(&parent.id, ACTOR).unwrap();
    assert!(engine.list_risk_categories(&org).unwrap().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// LIBRARY TABLES
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn apply_generation_upserts_by_code_and_logs_each_run() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let org = seed_org(&engine, "Acme Bank");
    let item = SeedItem {
        code: "RC-001".to_string(),
        item_type: LibraryItemType::RootCause,
        title: "Inadequate segregation of duties".to_string(),
        description: String::new(),
        category_hints: vec!["operational".to_string()],
        industry_tags: vec![],
    };
    let mut counts = GenerationCounts::default();
    counts.add(LibraryItemType::RootCause, 1);
    let log = |id: &str| GenerationLog {
        id: id.to_string(),
        organization_id: org.clone(),
        categories: vec!["Operational".to_string()],
        industry: None,
        counts,
        generated_by: ACTOR.to_string(),
        created_at: Utc::now(),
    };

    engine.apply_generation(&org, &[item.clone()], &log("run-1")).unwrap();
    let renamed = SeedItem {
        title: "Weak segregation of duties".to_string(),
        ..item
    };
    engine.apply_generation(&org, &[renamed], &log("run-2")).unwrap();

    let items = engine
        .list_library_items(&org, LibraryItemType::RootCause)
        .unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Weak segregation of duties");
    assert!(engine
        .list_library_items(&org, LibraryItemType::Control)
        .unwrap()
        .is_empty());

    let logs = engine.list_generation_logs(&org).unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].counts.root_cause, 1);
}

#[test]
fn seed_catalog_upsert_overwrites_by_code() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let mut item = SeedItem {
        code: "KRI-001".to_string(),
        item_type: LibraryItemType::Kri,
        title: "Failed trades".to_string(),
        description: String::new(),
        category_hints: vec!["market".to_string()],
        industry_tags: vec!["banking".to_string()],
    };
    engine.upsert_seed_items(&[item.clone()]).unwrap();
    item.title = "Failed trade count".to_string();
    engine.upsert_seed_items(&[item]).unwrap();

    let seeds = engine.list_seed_items().unwrap();
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].title, "Failed trade count");
    assert_eq!(seeds[0].industry_tags, vec!["banking".to_string()]);
}

#[test]
fn statement_listing_is_scoped_to_organization() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let a = seed_org(&engine, "Bank A");
    let b = seed_org(&engine, "Bank B");
    draft(&engine, &a);
    assert!(engine.list_statements(&b).unwrap().is_empty());
}
