use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use riskgov_core::config::LibraryConfig;
use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::{
    Capability, GenerationLog, LibraryItem, LibraryItemType, SeedItem, SessionContext,
};
use riskgov_core::traits::{IAdminStorage, ILibraryStorage};
use riskgov_observability::events;

use crate::matcher::{self, MatchCriteria};

/// Generates organization libraries from the shared seed catalog.
pub struct LibraryGenerator {
    library: Arc<dyn ILibraryStorage>,
    organizations: Arc<dyn IAdminStorage>,
    config: LibraryConfig,
}

impl LibraryGenerator {
    pub fn new(
        library: Arc<dyn ILibraryStorage>,
        organizations: Arc<dyn IAdminStorage>,
        config: LibraryConfig,
    ) -> Self {
        Self {
            library,
            organizations,
            config,
        }
    }

    /// Replace the shared catalog rows by code. Platform-level only.
    pub fn load_catalog(&self, ctx: &SessionContext, items: &[SeedItem]) -> RiskGovResult<usize> {
        ctx.require(Capability::ManageOrganizations)?;
        let written = self.library.upsert_seed_items(items)?;
        tracing::info!(written, "seed catalog loaded");
        Ok(written)
    }

    /// Match the catalog against `categories` and the organization's
    /// industry, then upsert the selection and log the run. Re-running with
    /// the same input leaves the library tables unchanged.
    pub fn generate(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        categories: &[String],
    ) -> RiskGovResult<GenerationLog> {
        ctx.require_in(Capability::GenerateLibrary, organization_id)?;
        let categories = clean_categories(categories);
        if categories.is_empty() {
            return Err(RiskGovError::validation(
                "categories",
                "select at least one risk category",
            ));
        }
        let organization = self
            .organizations
            .get_organization(organization_id)?
            .ok_or_else(|| RiskGovError::not_found("organization", organization_id))?;

        let catalog = self.library.list_seed_items()?;
        let criteria = MatchCriteria {
            categories: categories.clone(),
            industry: organization.industry.clone(),
            match_industry_tags: self.config.match_industry_tags,
        };
        let selected = matcher::select(&catalog, &criteria);
        let counts = matcher::count(&matcher::partition(&selected));
        let log = GenerationLog {
            id: riskgov_core::new_id(),
            organization_id: organization_id.to_string(),
            categories,
            industry: organization.industry,
            counts,
            generated_by: ctx.user_id.clone(),
            created_at: Utc::now(),
        };
        let items: Vec<SeedItem> = selected.into_iter().cloned().collect();
        self.library.apply_generation(organization_id, &items, &log)?;
        events::library_generated(organization_id, log.categories.len(), counts.total());
        Ok(log)
    }

    pub fn list_items(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
        item_type: LibraryItemType,
    ) -> RiskGovResult<Vec<LibraryItem>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.library.list_library_items(organization_id, item_type)
    }

    /// Newest first.
    pub fn list_runs(
        &self,
        ctx: &SessionContext,
        organization_id: &str,
    ) -> RiskGovResult<Vec<GenerationLog>> {
        ctx.require_in(Capability::ViewGovernance, organization_id)?;
        self.library.list_generation_logs(organization_id)
    }
}

/// Trimmed, non-blank, first spelling wins on case-insensitive duplicates.
fn clean_categories(categories: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    categories
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.to_lowercase()))
        .map(str::to_string)
        .collect()
}
