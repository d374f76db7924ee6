mod common;

use riskgov_core::errors::{AdminError, RiskGovError};
use riskgov_core::models::{Regulator, Role, SessionContext};

use common::{as_role, Admin};

fn regulator(admin: &Admin) -> Regulator {
    admin
        .regulators
        .create_regulator(&admin.root, "Prudential Authority", "ZA", "Supervision@PA.example")
        .unwrap()
}

fn regulator_session(regulator: &Regulator) -> SessionContext {
    SessionContext::new("examiner-1", regulator.id.clone(), Role::Regulator)
}

#[test]
fn only_super_admin_manages_regulators() {
    let admin = Admin::new();
    let (_, primary) = admin.tenant("Acme Bank");
    let err = admin
        .regulators
        .create_regulator(&primary, "Rogue", "XX", "r@x.example")
        .unwrap_err();
    assert!(matches!(err, RiskGovError::AdminError(AdminError::PermissionDenied { .. })));

    let created = regulator(&admin);
    assert_eq!(created.contact_email, "supervision@pa.example");
    assert_eq!(admin.regulators.list_regulators(&admin.root).unwrap().len(), 1);
}

#[test]
fn primary_admin_grants_and_revokes_access() {
    let admin = Admin::new();
    let (org, primary) = admin.tenant("Acme Bank");
    let pa = regulator(&admin);

    admin.regulators.grant_access(&primary, &pa.id, &org).unwrap();
    let listed = admin.regulators.regulators_for_organization(&primary, &org).unwrap();
    assert_eq!(listed.len(), 1);

    let session = regulator_session(&pa);
    assert_eq!(
        admin.regulators.organizations_for_regulator(&session, &pa.id).unwrap(),
        vec![org.clone()]
    );

    admin.regulators.revoke_access(&primary, &pa.id, &org).unwrap();
    assert!(admin
        .regulators
        .organizations_for_regulator(&session, &pa.id)
        .unwrap()
        .is_empty());
}

#[test]
fn secondary_admin_cannot_grant() {
    let admin = Admin::new();
    let (org, _) = admin.tenant("Acme Bank");
    let pa = regulator(&admin);
    let secondary = as_role(&org, Role::SecondaryAdmin);
    assert!(admin.regulators.grant_access(&secondary, &pa.id, &org).is_err());
}

#[test]
fn grant_to_unknown_regulator_is_not_found() {
    let admin = Admin::new();
    let (org, primary) = admin.tenant("Acme Bank");
    let err = admin
        .regulators
        .grant_access(&primary, "no-such-regulator", &org)
        .unwrap_err();
    assert!(matches!(err, RiskGovError::NotFound { entity: "regulator", .. }));
}

#[test]
fn regulator_with_active_grant_cannot_be_deleted() {
    let admin = Admin::new();
    let (org, primary) = admin.tenant("Acme Bank");
    let pa = regulator(&admin);
    admin.regulators.grant_access(&primary, &pa.id, &org).unwrap();

    let err = admin.regulators.delete_regulator(&admin.root, &pa.id).unwrap_err();
    assert!(matches!(err, RiskGovError::AdminError(AdminError::InUse { .. })));

    admin.regulators.revoke_access(&primary, &pa.id, &org).unwrap();
    admin.regulators.delete_regulator(&admin.root, &pa.id).unwrap();
    assert!(admin.regulators.list_regulators(&admin.root).unwrap().is_empty());
}

#[test]
fn scoped_session_requires_active_grant() {
    let admin = Admin::new();
    let (acme, primary) = admin.tenant("Acme Bank");
    let (other, _) = admin.tenant("Other Bank");
    let pa = regulator(&admin);
    admin.regulators.grant_access(&primary, &pa.id, &acme).unwrap();
    let session = regulator_session(&pa);

    let scoped = admin.regulators.scoped_session(&session, &acme).unwrap();
    assert_eq!(scoped.organization_id, acme);
    assert_eq!(scoped.role, Role::Regulator);

    assert!(admin.regulators.scoped_session(&session, &other).is_err());
    assert!(admin.regulators.scoped_session(&primary, &acme).is_err());
}

#[test]
fn regulators_only_list_their_own_grants() {
    let admin = Admin::new();
    let pa = regulator(&admin);
    let other = admin
        .regulators
        .create_regulator(&admin.root, "Conduct Authority", "ZA", "fsca@conduct.example")
        .unwrap();
    let session = regulator_session(&pa);

    assert!(admin.regulators.organizations_for_regulator(&session, &other.id).is_err());
    assert!(admin.regulators.organizations_for_regulator(&admin.root, &other.id).is_ok());
}
