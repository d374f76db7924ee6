//! Test fixture loader for seed catalogs and taxonomies.
//!
//! Fixtures live next to this crate under `fixtures/`, so the loader works
//! from any crate in the workspace.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the fixtures folder.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by path.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension()
                .is_some_and(|ext| ext == "json")
                .then_some(path)
        })
        .collect();
    paths.sort();
    paths
}

/// One node of a taxonomy fixture. `parent` refers to another node by name.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyNode {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A named taxonomy fixture, e.g. `taxonomy/banking.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyFixture {
    pub industry: String,
    pub categories: Vec<TaxonomyNode>,
}

pub fn load_taxonomy(name: &str) -> TaxonomyFixture {
    load_fixture(&format!("taxonomy/{name}.json"))
}

/// Path of the shared seed catalog, deserializable as a list of seed items.
pub const SEED_CATALOG: &str = "library/seed_catalog.json";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_root_exists() {
        assert!(fixtures_root().exists(), "fixtures directory not found");
    }

    #[test]
    fn seed_catalog_is_a_list() {
        let value = load_fixture_value(SEED_CATALOG);
        let items = value.as_array().expect("seed catalog is an array");
        assert!(items.len() >= 10);
        for item in items {
            assert!(item.get("code").is_some());
            assert!(item.get("item_type").is_some());
        }
    }

    #[test]
    fn taxonomy_parents_resolve() {
        for path in list_fixtures("taxonomy") {
            let relative = format!(
                "taxonomy/{}",
                path.file_name().unwrap().to_string_lossy()
            );
            let fixture: TaxonomyFixture = load_fixture(&relative);
            let names: Vec<&str> = fixture.categories.iter().map(|c| c.name.as_str()).collect();
            for node in &fixture.categories {
                if let Some(parent) = &node.parent {
                    assert!(names.contains(&parent.as_str()), "dangling parent {parent}");
                }
            }
        }
    }

    #[test]
    fn missing_fixture_reports_false() {
        assert!(!fixture_exists("taxonomy/does_not_exist.json"));
        assert!(fixture_exists(SEED_CATALOG));
    }
}
