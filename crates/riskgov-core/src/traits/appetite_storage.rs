use chrono::NaiveDate;

use crate::errors::RiskGovResult;
use crate::models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, DeleteCheck, NewAppetiteCategory,
    NewStatement, StatementSupersession,
};

/// Statements + appetite categories, including the atomic lifecycle procedures.
///
/// Every mutating method evaluates the governance rules inside the same
/// transaction as its write and records an audit entry attributed to `actor`.
pub trait IAppetiteStorage: Send + Sync {
    // --- Statements ---
    fn create_statement(&self, input: &NewStatement) -> RiskGovResult<AppetiteStatement>;
    fn get_statement(&self, id: &str) -> RiskGovResult<Option<AppetiteStatement>>;
    /// All statements of an organization, newest version first.
    fn list_statements(&self, organization_id: &str) -> RiskGovResult<Vec<AppetiteStatement>>;
    fn update_statement(
        &self,
        id: &str,
        statement_text: &str,
        effective_from: NaiveDate,
        expected_row_version: i64,
        actor: &str,
    ) -> RiskGovResult<AppetiteStatement>;
    fn approve_statement(
        &self,
        id: &str,
        approver_id: &str,
        allow_self_approval: bool,
    ) -> RiskGovResult<AppetiteStatement>;
    fn supersede_statement(
        &self,
        id: &str,
        new_effective_from: NaiveDate,
        actor: &str,
    ) -> RiskGovResult<StatementSupersession>;
    fn can_delete_statement(&self, id: &str) -> RiskGovResult<DeleteCheck>;
    fn delete_statement(&self, id: &str, actor: &str) -> RiskGovResult<()>;

    // --- Appetite categories ---
    fn create_category(
        &self,
        input: &NewAppetiteCategory,
        actor: &str,
    ) -> RiskGovResult<AppetiteCategory>;
    fn get_category(&self, id: &str) -> RiskGovResult<Option<AppetiteCategory>>;
    fn list_categories(&self, statement_id: &str) -> RiskGovResult<Vec<AppetiteCategory>>;
    fn update_category(
        &self,
        id: &str,
        appetite_level: AppetiteLevel,
        rationale: &str,
        actor: &str,
    ) -> RiskGovResult<AppetiteCategory>;
    fn can_delete_appetite_category(&self, id: &str) -> RiskGovResult<DeleteCheck>;
    fn delete_category(&self, id: &str, actor: &str) -> RiskGovResult<()>;
}
