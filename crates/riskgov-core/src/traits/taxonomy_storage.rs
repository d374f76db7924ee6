use crate::errors::RiskGovResult;
use crate::models::{NewRiskCategory, RiskCategory};

/// Organization risk taxonomy.
pub trait ITaxonomyStorage: Send + Sync {
    fn create_risk_category(
        &self,
        input: &NewRiskCategory,
        actor: &str,
    ) -> RiskGovResult<RiskCategory>;
    fn get_risk_category(&self, id: &str) -> RiskGovResult<Option<RiskCategory>>;
    fn list_risk_categories(&self, organization_id: &str) -> RiskGovResult<Vec<RiskCategory>>;
    fn rename_risk_category(&self, id: &str, name: &str, actor: &str)
        -> RiskGovResult<RiskCategory>;
    /// Refused while the category still has sub-categories.
    fn delete_risk_category(&self, id: &str, actor: &str) -> RiskGovResult<()>;
}
