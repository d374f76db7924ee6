//! Seed selection by category hint and industry tag.

use std::collections::BTreeMap;

use riskgov_core::models::{GenerationCounts, LibraryItemType, SeedItem};

/// Case-insensitive substring match in either direction. Blank on either
/// side never matches.
pub fn overlaps(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

fn any_overlap(needles: &[String], haystack: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.iter().any(|hay| overlaps(needle, hay)))
}

/// What to match the catalog against.
#[derive(Debug, Clone, Default)]
pub struct MatchCriteria {
    pub categories: Vec<String>,
    pub industry: Option<String>,
    /// When false only category hints are considered.
    pub match_industry_tags: bool,
}

impl MatchCriteria {
    pub fn matches(&self, item: &SeedItem) -> bool {
        if any_overlap(&self.categories, &item.category_hints) {
            return true;
        }
        match (&self.industry, self.match_industry_tags) {
            (Some(industry), true) => item.industry_tags.iter().any(|tag| overlaps(industry, tag)),
            _ => false,
        }
    }
}

/// Catalog rows selected by `criteria`, in catalog order.
pub fn select<'a>(catalog: &'a [SeedItem], criteria: &MatchCriteria) -> Vec<&'a SeedItem> {
    catalog.iter().filter(|item| criteria.matches(item)).collect()
}

/// Group selected rows by target table.
pub fn partition<'a>(items: &[&'a SeedItem]) -> BTreeMap<LibraryItemType, Vec<&'a SeedItem>> {
    let mut groups: BTreeMap<LibraryItemType, Vec<&'a SeedItem>> = BTreeMap::new();
    for &item in items {
        groups.entry(item.item_type).or_default().push(item);
    }
    groups
}

pub fn count(groups: &BTreeMap<LibraryItemType, Vec<&SeedItem>>) -> GenerationCounts {
    let mut counts = GenerationCounts::default();
    for (item_type, items) in groups {
        counts.add(*item_type, u32::try_from(items.len()).unwrap_or(u32::MAX));
    }
    counts
}
