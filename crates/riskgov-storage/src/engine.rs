//! StorageEngine: owns the ConnectionPool, runs migrations on open, and
//! implements every storage trait of `riskgov-core`.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Connection;

use riskgov_core::config::StorageConfig;
use riskgov_core::errors::RiskGovResult;
use riskgov_core::models::{
    AppetiteCategory, AppetiteLevel, AppetiteStatement, AuditChainReport, AuditEntry, AuditQuery,
    DeleteCheck, Department, Division, GenerationLog, InvitationStatus, LibraryItem,
    LibraryItemType, MetricSupersession, NewAppetiteCategory, NewRiskCategory, NewStatement,
    NewToleranceMetric, Organization, OrganizationStatus, OrganizationSummary, Regulator,
    RegulatorAccess, RiskCategory, SeedItem, StatementSupersession, ToleranceMetric,
    ToleranceMetricEdit, UserInvitation, UserProfile, UserStatus,
};
use riskgov_core::traits::{
    IAdminStorage, IAppetiteStorage, IAuditStorage, IChainSource, ILibraryStorage,
    ITaxonomyStorage, IToleranceStorage,
};

use crate::audit;
use crate::migrations;
use crate::pool::ConnectionPool;
use crate::procedures::{admin, appetite, library, taxonomy, tolerance};
use crate::queries::{
    audit_ops, category_ops, invitation_ops, library_ops, metric_ops, organization_ops,
    regulator_ops, statement_ops, structure_ops, taxonomy_ops, user_ops,
};

/// The main storage engine.
pub struct StorageEngine {
    pool: ConnectionPool,
    /// When true, reads use the read pool (file-backed mode).
    /// When false, reads go through the writer, because in-memory read pool
    /// connections are isolated databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, config: &StorageConfig) -> RiskGovResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> RiskGovResult<Self> {
        let pool = ConnectionPool::open_in_memory(&StorageConfig::default())?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> RiskGovResult<()> {
        self.pool.writer.with_conn(|conn| {
            let applied = migrations::run_migrations(conn)?;
            tracing::debug!(applied, latest = migrations::LATEST_VERSION, "storage engine ready");
            Ok(())
        })
    }

    /// Get a reference to the connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only query on the best available connection.
    fn with_reader<F, T>(&self, f: F) -> RiskGovResult<T>
    where
        F: FnOnce(&Connection) -> RiskGovResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    fn with_writer<F, T>(&self, f: F) -> RiskGovResult<T>
    where
        F: FnOnce(&Connection) -> RiskGovResult<T>,
    {
        self.pool.writer.with_conn(f)
    }
}

impl IAppetiteStorage for StorageEngine {
    fn create_statement(&self, input: &NewStatement) -> RiskGovResult<AppetiteStatement> {
        self.with_writer(|conn| appetite::create_statement(conn, input))
    }

    fn get_statement(&self, id: &str) -> RiskGovResult<Option<AppetiteStatement>> {
        self.with_reader(|conn| statement_ops::get_statement(conn, id))
    }

    fn list_statements(&self, organization_id: &str) -> RiskGovResult<Vec<AppetiteStatement>> {
        self.with_reader(|conn| statement_ops::list_statements(conn, organization_id))
    }

    fn update_statement(
        &self,
        id: &str,
        statement_text: &str,
        effective_from: NaiveDate,
        expected_row_version: i64,
        actor: &str,
    ) -> RiskGovResult<AppetiteStatement> {
        self.with_writer(|conn| {
            appetite::update_statement(
                conn,
                id,
                statement_text,
                effective_from,
                expected_row_version,
                actor,
            )
        })
    }

    fn approve_statement(
        &self,
        id: &str,
        approver_id: &str,
        allow_self_approval: bool,
    ) -> RiskGovResult<AppetiteStatement> {
        self.with_writer(|conn| appetite::approve_statement(conn, id, approver_id, allow_self_approval))
    }

    fn supersede_statement(
        &self,
        id: &str,
        new_effective_from: NaiveDate,
        actor: &str,
    ) -> RiskGovResult<StatementSupersession> {
        self.with_writer(|conn| appetite::supersede_statement(conn, id, new_effective_from, actor))
    }

    fn can_delete_statement(&self, id: &str) -> RiskGovResult<DeleteCheck> {
        self.with_reader(|conn| appetite::can_delete_statement(conn, id))
    }

    fn delete_statement(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| appetite::delete_statement(conn, id, actor))
    }

    fn create_category(
        &self,
        input: &NewAppetiteCategory,
        actor: &str,
    ) -> RiskGovResult<AppetiteCategory> {
        self.with_writer(|conn| appetite::create_category(conn, input, actor))
    }

    fn get_category(&self, id: &str) -> RiskGovResult<Option<AppetiteCategory>> {
        self.with_reader(|conn| category_ops::get_category(conn, id))
    }

    fn list_categories(&self, statement_id: &str) -> RiskGovResult<Vec<AppetiteCategory>> {
        self.with_reader(|conn| category_ops::list_by_statement(conn, statement_id))
    }

    fn update_category(
        &self,
        id: &str,
        appetite_level: AppetiteLevel,
        rationale: &str,
        actor: &str,
    ) -> RiskGovResult<AppetiteCategory> {
        self.with_writer(|conn| appetite::update_category(conn, id, appetite_level, rationale, actor))
    }

    fn can_delete_appetite_category(&self, id: &str) -> RiskGovResult<DeleteCheck> {
        self.with_reader(|conn| appetite::can_delete_category(conn, id))
    }

    fn delete_category(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| appetite::delete_category(conn, id, actor))
    }
}

impl IToleranceStorage for StorageEngine {
    fn create_metric(
        &self,
        input: &NewToleranceMetric,
        actor: &str,
    ) -> RiskGovResult<ToleranceMetric> {
        self.with_writer(|conn| tolerance::create_metric(conn, input, actor))
    }

    fn get_metric(&self, id: &str) -> RiskGovResult<Option<ToleranceMetric>> {
        self.with_reader(|conn| metric_ops::get_metric(conn, id))
    }

    fn list_metrics(&self, organization_id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
        self.with_reader(|conn| metric_ops::list_by_organization(conn, organization_id))
    }

    fn list_metrics_for_category(
        &self,
        appetite_category_id: &str,
    ) -> RiskGovResult<Vec<ToleranceMetric>> {
        self.with_reader(|conn| metric_ops::list_by_category(conn, appetite_category_id))
    }

    fn metric_history(&self, id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
        self.with_reader(|conn| tolerance::metric_history(conn, id))
    }

    fn update_metric(
        &self,
        id: &str,
        edit: &ToleranceMetricEdit,
        expected_row_version: i64,
        actor: &str,
    ) -> RiskGovResult<ToleranceMetric> {
        self.with_writer(|conn| tolerance::update_metric(conn, id, edit, expected_row_version, actor))
    }

    fn activate_metric(&self, id: &str, actor: &str) -> RiskGovResult<ToleranceMetric> {
        self.with_writer(|conn| tolerance::activate_metric(conn, id, actor))
    }

    fn deactivate_metric(&self, id: &str, actor: &str) -> RiskGovResult<ToleranceMetric> {
        self.with_writer(|conn| tolerance::deactivate_metric(conn, id, actor))
    }

    fn supersede_metric(
        &self,
        id: &str,
        new_effective_from: NaiveDate,
        actor: &str,
    ) -> RiskGovResult<MetricSupersession> {
        self.with_writer(|conn| tolerance::supersede_metric(conn, id, new_effective_from, actor))
    }

    fn can_delete_tolerance_metric(&self, id: &str) -> RiskGovResult<DeleteCheck> {
        self.with_reader(|conn| tolerance::can_delete_metric(conn, id))
    }

    fn delete_metric(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| tolerance::delete_metric(conn, id, actor))
    }
}

impl ITaxonomyStorage for StorageEngine {
    fn create_risk_category(
        &self,
        input: &NewRiskCategory,
        actor: &str,
    ) -> RiskGovResult<RiskCategory> {
        self.with_writer(|conn| taxonomy::create(conn, input, actor))
    }

    fn get_risk_category(&self, id: &str) -> RiskGovResult<Option<RiskCategory>> {
        self.with_reader(|conn| taxonomy_ops::get(conn, id))
    }

    fn list_risk_categories(&self, organization_id: &str) -> RiskGovResult<Vec<RiskCategory>> {
        self.with_reader(|conn| taxonomy_ops::list(conn, organization_id))
    }

    fn rename_risk_category(
        &self,
        id: &str,
        name: &str,
        actor: &str,
    ) -> RiskGovResult<RiskCategory> {
        self.with_writer(|conn| taxonomy::rename(conn, id, name, actor))
    }

    fn delete_risk_category(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| taxonomy::delete(conn, id, actor))
    }
}

impl IChainSource for StorageEngine {
    fn risk_categories(&self, organization_id: &str) -> RiskGovResult<Vec<RiskCategory>> {
        self.list_risk_categories(organization_id)
    }

    fn active_statement(&self, organization_id: &str) -> RiskGovResult<Option<AppetiteStatement>> {
        self.with_reader(|conn| appetite::active_statement(conn, organization_id))
    }

    fn appetite_categories(&self, statement_id: &str) -> RiskGovResult<Vec<AppetiteCategory>> {
        self.list_categories(statement_id)
    }

    fn tolerance_metrics(&self, organization_id: &str) -> RiskGovResult<Vec<ToleranceMetric>> {
        self.list_metrics(organization_id)
    }
}

impl ILibraryStorage for StorageEngine {
    fn upsert_seed_items(&self, items: &[SeedItem]) -> RiskGovResult<usize> {
        self.with_writer(|conn| library::upsert_seed_items(conn, items))
    }

    fn list_seed_items(&self) -> RiskGovResult<Vec<SeedItem>> {
        self.with_reader(library_ops::list_seeds)
    }

    fn apply_generation(
        &self,
        organization_id: &str,
        items: &[SeedItem],
        log: &GenerationLog,
    ) -> RiskGovResult<()> {
        self.with_writer(|conn| library::apply_generation(conn, organization_id, items, log))
    }

    fn list_library_items(
        &self,
        organization_id: &str,
        item_type: LibraryItemType,
    ) -> RiskGovResult<Vec<LibraryItem>> {
        self.with_reader(|conn| library_ops::list_library_items(conn, organization_id, item_type))
    }

    fn list_generation_logs(&self, organization_id: &str) -> RiskGovResult<Vec<GenerationLog>> {
        self.with_reader(|conn| library_ops::list_generation_logs(conn, organization_id))
    }
}

impl IAuditStorage for StorageEngine {
    fn query_audit(&self, query: &AuditQuery) -> RiskGovResult<Vec<AuditEntry>> {
        self.with_reader(|conn| audit_ops::query(conn, query))
    }

    fn verify_audit_chain(&self) -> RiskGovResult<AuditChainReport> {
        self.with_reader(audit::verify_chain)
    }
}

impl IAdminStorage for StorageEngine {
    fn create_organization(&self, org: &Organization, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::create_organization(conn, org, actor))
    }

    fn get_organization(&self, id: &str) -> RiskGovResult<Option<Organization>> {
        self.with_reader(|conn| organization_ops::get(conn, id))
    }

    fn find_organization_by_name(&self, name: &str) -> RiskGovResult<Option<Organization>> {
        self.with_reader(|conn| organization_ops::find_by_name(conn, name))
    }

    fn list_organizations_admin(&self) -> RiskGovResult<Vec<OrganizationSummary>> {
        self.with_reader(organization_ops::list_summaries)
    }

    fn set_organization_status(
        &self,
        id: &str,
        status: OrganizationStatus,
        actor: &str,
    ) -> RiskGovResult<Organization> {
        self.with_writer(|conn| admin::set_organization_status(conn, id, status, actor))
    }

    fn set_organization_industry(
        &self,
        id: &str,
        industry: Option<&str>,
        actor: &str,
    ) -> RiskGovResult<Organization> {
        self.with_writer(|conn| admin::set_organization_industry(conn, id, industry, actor))
    }

    fn create_division(&self, division: &Division, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::create_division(conn, division, actor))
    }

    fn get_division(&self, id: &str) -> RiskGovResult<Option<Division>> {
        self.with_reader(|conn| structure_ops::get_division(conn, id))
    }

    fn list_divisions(&self, organization_id: &str) -> RiskGovResult<Vec<Division>> {
        self.with_reader(|conn| structure_ops::list_divisions(conn, organization_id))
    }

    fn rename_division(&self, id: &str, name: &str, actor: &str) -> RiskGovResult<Division> {
        self.with_writer(|conn| admin::rename_division(conn, id, name, actor))
    }

    fn delete_division(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::delete_division(conn, id, actor))
    }

    fn create_department(&self, department: &Department, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::create_department(conn, department, actor))
    }

    fn get_department(&self, id: &str) -> RiskGovResult<Option<Department>> {
        self.with_reader(|conn| structure_ops::get_department(conn, id))
    }

    fn list_departments(
        &self,
        organization_id: &str,
        division_id: Option<&str>,
    ) -> RiskGovResult<Vec<Department>> {
        self.with_reader(|conn| structure_ops::list_departments(conn, organization_id, division_id))
    }

    fn delete_department(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::delete_department(conn, id, actor))
    }

    fn create_invitation(&self, invitation: &UserInvitation) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::create_invitation(conn, invitation))
    }

    fn get_invitation(&self, id: &str) -> RiskGovResult<Option<UserInvitation>> {
        self.with_reader(|conn| invitation_ops::get(conn, id))
    }

    fn find_invitation_by_token(&self, token: &str) -> RiskGovResult<Option<UserInvitation>> {
        self.with_reader(|conn| invitation_ops::find_by_token(conn, token))
    }

    fn list_invitations(
        &self,
        organization_id: &str,
        status: Option<InvitationStatus>,
    ) -> RiskGovResult<Vec<UserInvitation>> {
        self.with_reader(|conn| invitation_ops::list(conn, organization_id, status))
    }

    fn set_invitation_status(
        &self,
        id: &str,
        status: InvitationStatus,
        actor: &str,
    ) -> RiskGovResult<UserInvitation> {
        self.with_writer(|conn| admin::set_invitation_status(conn, id, status, actor))
    }

    fn accept_invitation(
        &self,
        invitation_id: &str,
        user: &UserProfile,
        at: DateTime<Utc>,
    ) -> RiskGovResult<UserInvitation> {
        self.with_writer(|conn| admin::accept_invitation(conn, invitation_id, user, at))
    }

    fn expire_invitations(&self, now: DateTime<Utc>) -> RiskGovResult<usize> {
        self.with_writer(|conn| admin::expire_invitations(conn, now))
    }

    fn get_user(&self, id: &str) -> RiskGovResult<Option<UserProfile>> {
        self.with_reader(|conn| user_ops::get(conn, id))
    }

    fn find_user_by_email(
        &self,
        organization_id: &str,
        email: &str,
    ) -> RiskGovResult<Option<UserProfile>> {
        self.with_reader(|conn| user_ops::find_by_email(conn, organization_id, email))
    }

    fn list_users(
        &self,
        organization_id: &str,
        status: Option<UserStatus>,
    ) -> RiskGovResult<Vec<UserProfile>> {
        self.with_reader(|conn| user_ops::list(conn, organization_id, status))
    }

    fn set_user_status(
        &self,
        id: &str,
        status: UserStatus,
        actor: &str,
    ) -> RiskGovResult<UserProfile> {
        self.with_writer(|conn| admin::set_user_status(conn, id, status, actor))
    }

    fn create_regulator(&self, regulator: &Regulator, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::create_regulator(conn, regulator, actor))
    }

    fn get_regulator(&self, id: &str) -> RiskGovResult<Option<Regulator>> {
        self.with_reader(|conn| regulator_ops::get(conn, id))
    }

    fn list_regulators(&self) -> RiskGovResult<Vec<Regulator>> {
        self.with_reader(regulator_ops::list)
    }

    fn delete_regulator(&self, id: &str, actor: &str) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::delete_regulator(conn, id, actor))
    }

    fn grant_regulator_access(&self, access: &RegulatorAccess) -> RiskGovResult<()> {
        self.with_writer(|conn| admin::grant_regulator_access(conn, access))
    }

    fn revoke_regulator_access(
        &self,
        regulator_id: &str,
        organization_id: &str,
        actor: &str,
    ) -> RiskGovResult<()> {
        self.with_writer(|conn| {
            admin::revoke_regulator_access(conn, regulator_id, organization_id, actor)
        })
    }

    fn list_regulator_access(&self, regulator_id: &str) -> RiskGovResult<Vec<RegulatorAccess>> {
        self.with_reader(|conn| regulator_ops::list_access(conn, regulator_id))
    }

    fn list_regulators_for_organization(
        &self,
        organization_id: &str,
    ) -> RiskGovResult<Vec<Regulator>> {
        self.with_reader(|conn| regulator_ops::list_for_organization(conn, organization_id))
    }
}
