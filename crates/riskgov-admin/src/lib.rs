//! # riskgov-admin
//!
//! Tenant and platform administration. Every operation takes the caller's
//! [`SessionContext`](riskgov_core::models::SessionContext) and checks role
//! capabilities and tenant scope before touching storage.

pub mod audit_trail;
pub mod email;
pub mod invitations;
pub mod organizations;
pub mod regulators;
pub mod structure;
pub mod taxonomy;

pub use audit_trail::AuditTrailService;
pub use invitations::InvitationService;
pub use organizations::OrganizationService;
pub use regulators::RegulatorService;
pub use structure::StructureService;
pub use taxonomy::TaxonomyService;

use riskgov_core::constants::MAX_NAME_LEN;
use riskgov_core::errors::{RiskGovError, RiskGovResult};

/// Trimmed non-blank name of bounded length.
pub(crate) fn clean_name(field: &str, value: &str) -> RiskGovResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RiskGovError::validation(field, "must not be blank"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(RiskGovError::validation(
            field,
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}
