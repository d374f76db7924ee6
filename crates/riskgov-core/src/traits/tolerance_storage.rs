use chrono::NaiveDate;

use crate::errors::RiskGovResult;
use crate::models::{
    DeleteCheck, MetricSupersession, NewToleranceMetric, ToleranceMetric, ToleranceMetricEdit,
};

/// Tolerance metrics and their activation lifecycle.
pub trait IToleranceStorage: Send + Sync {
    /// Always stores the metric inactive and never activated.
    fn create_metric(&self, input: &NewToleranceMetric, actor: &str)
        -> RiskGovResult<ToleranceMetric>;
    fn get_metric(&self, id: &str) -> RiskGovResult<Option<ToleranceMetric>>;
    fn list_metrics(&self, organization_id: &str) -> RiskGovResult<Vec<ToleranceMetric>>;
    fn list_metrics_for_category(
        &self,
        appetite_category_id: &str,
    ) -> RiskGovResult<Vec<ToleranceMetric>>;
    /// Version chain ending at `id`, oldest first.
    fn metric_history(&self, id: &str) -> RiskGovResult<Vec<ToleranceMetric>>;
    fn update_metric(
        &self,
        id: &str,
        edit: &ToleranceMetricEdit,
        expected_row_version: i64,
        actor: &str,
    ) -> RiskGovResult<ToleranceMetric>;
    fn activate_metric(&self, id: &str, actor: &str) -> RiskGovResult<ToleranceMetric>;
    /// Soft close: `is_active = false`, `effective_to = today`.
    fn deactivate_metric(&self, id: &str, actor: &str) -> RiskGovResult<ToleranceMetric>;
    fn supersede_metric(
        &self,
        id: &str,
        new_effective_from: NaiveDate,
        actor: &str,
    ) -> RiskGovResult<MetricSupersession>;
    fn can_delete_tolerance_metric(&self, id: &str) -> RiskGovResult<DeleteCheck>;
    fn delete_metric(&self, id: &str, actor: &str) -> RiskGovResult<()>;
}
