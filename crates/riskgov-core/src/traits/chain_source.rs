use crate::errors::RiskGovResult;
use crate::models::{AppetiteCategory, AppetiteStatement, RiskCategory, ToleranceMetric};

/// Read-only inputs of the appetite→tolerance chain validator.
pub trait IChainSource: Send + Sync {
    fn risk_categories(&self, organization_id: &str) -> RiskGovResult<Vec<RiskCategory>>;
    /// The APPROVED statement, else the newest DRAFT, else `None`.
    fn active_statement(&self, organization_id: &str) -> RiskGovResult<Option<AppetiteStatement>>;
    fn appetite_categories(&self, statement_id: &str) -> RiskGovResult<Vec<AppetiteCategory>>;
    fn tolerance_metrics(&self, organization_id: &str) -> RiskGovResult<Vec<ToleranceMetric>>;
}
