use crate::errors::RiskGovResult;
use crate::models::{GenerationLog, LibraryItem, LibraryItemType, SeedItem};

/// Shared seed catalog and per-organization library tables.
pub trait ILibraryStorage: Send + Sync {
    /// Insert or overwrite catalog rows by code. Returns rows written.
    fn upsert_seed_items(&self, items: &[SeedItem]) -> RiskGovResult<usize>;
    fn list_seed_items(&self) -> RiskGovResult<Vec<SeedItem>>;
    /// Upsert `items` into their per-type tables keyed by (organization, code)
    /// and append `log`, all in one transaction.
    fn apply_generation(
        &self,
        organization_id: &str,
        items: &[SeedItem],
        log: &GenerationLog,
    ) -> RiskGovResult<()>;
    fn list_library_items(
        &self,
        organization_id: &str,
        item_type: LibraryItemType,
    ) -> RiskGovResult<Vec<LibraryItem>>;
    /// Generation runs for an organization, newest first.
    fn list_generation_logs(&self, organization_id: &str) -> RiskGovResult<Vec<GenerationLog>>;
}
