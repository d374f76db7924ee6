mod appetite;
mod audit_entry;
mod chain;
mod delete_check;
mod dime;
mod invitation;
mod library;
mod organization;
mod regulator;
mod structure;
mod taxonomy;
mod tolerance;
mod user;

pub use appetite::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, NewAppetiteCategory, NewStatement,
    StatementStatus, StatementSupersession,
};
pub use audit_entry::{AuditChainReport, AuditEntity, AuditEntry, AuditOperation, AuditQuery};
pub use chain::{ChainGap, ChainValidationResult, GapSeverity};
pub use delete_check::DeleteCheck;
pub use dime::{ControlEffectiveness, DimeAssessment, DimeScores};
pub use invitation::{InvitationStatus, UserInvitation};
pub use library::{GenerationCounts, GenerationLog, LibraryItem, LibraryItemType, SeedItem};
pub use organization::{Organization, OrganizationStatus, OrganizationSummary};
pub use regulator::{Regulator, RegulatorAccess};
pub use structure::{Department, Division};
pub use taxonomy::{normalize_category_name, NewRiskCategory, RiskCategory};
pub use tolerance::{
    MaterialityType, MetricLifecycle, MetricSupersession, MetricType, NewToleranceMetric,
    ToleranceMetric, ToleranceMetricEdit, ToleranceStatus, Thresholds,
};
pub use user::{Capability, Role, SessionContext, UserProfile, UserStatus};
