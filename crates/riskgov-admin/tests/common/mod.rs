//! Admin services wired to one in-memory engine.
#![allow(dead_code)]

use std::sync::Arc;

use riskgov_admin::{
    AuditTrailService, InvitationService, OrganizationService, RegulatorService,
    StructureService, TaxonomyService,
};
use riskgov_core::config::AdminConfig;
use riskgov_core::models::{Role, SessionContext};
use riskgov_storage::StorageEngine;

pub struct Admin {
    pub engine: Arc<StorageEngine>,
    pub orgs: OrganizationService,
    pub structure: StructureService,
    pub taxonomy: TaxonomyService,
    pub invitations: InvitationService,
    pub regulators: RegulatorService,
    pub audit: AuditTrailService,
    pub root: SessionContext,
}

impl Admin {
    pub fn new() -> Self {
        let engine = Arc::new(StorageEngine::open_in_memory().unwrap());
        Self {
            orgs: OrganizationService::new(engine.clone()),
            structure: StructureService::new(engine.clone()),
            taxonomy: TaxonomyService::new(engine.clone()),
            invitations: InvitationService::new(engine.clone(), AdminConfig::default()),
            regulators: RegulatorService::new(engine.clone()),
            audit: AuditTrailService::new(engine.clone()),
            root: SessionContext::new("user-root", "platform", Role::SuperAdmin),
            engine,
        }
    }

    /// New organization plus its primary admin session.
    pub fn tenant(&self, name: &str) -> (String, SessionContext) {
        let org = self
            .orgs
            .create_organization(&self.root, name, Some("banking"))
            .unwrap();
        let primary = SessionContext::new(format!("primary-{}", org.id), org.id.clone(), Role::PrimaryAdmin);
        (org.id, primary)
    }
}

pub fn as_role(org: &str, role: Role) -> SessionContext {
    SessionContext::new(format!("{role}-{org}"), org, role)
}
