//! # riskgov-core
//!
//! Foundation crate for the risk governance workspace.
//! Defines models, lifecycle rules, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod lifecycle;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::RiskGovConfig;
pub use errors::{RiskGovError, RiskGovResult};
pub use models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, DeleteCheck, MetricLifecycle,
    StatementStatus, ToleranceMetric,
};

/// Generate a fresh identifier for a new row.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
