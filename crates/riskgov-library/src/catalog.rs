//! Seed catalog parsing.

use std::collections::HashSet;

use riskgov_core::errors::{RiskGovError, RiskGovResult};
use riskgov_core::models::SeedItem;

/// Parse a JSON array of seed items. Codes must be unique and titles present.
pub fn parse_catalog(json: &str) -> RiskGovResult<Vec<SeedItem>> {
    let items: Vec<SeedItem> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for item in &items {
        if item.code.trim().is_empty() {
            return Err(RiskGovError::validation("code", "must not be blank"));
        }
        if item.title.trim().is_empty() {
            return Err(RiskGovError::validation(
                "title",
                format!("seed item {} has no title", item.code),
            ));
        }
        if !seen.insert(item.code.as_str()) {
            return Err(RiskGovError::validation(
                "code",
                format!("duplicate seed code {}", item.code),
            ));
        }
    }
    Ok(items)
}
