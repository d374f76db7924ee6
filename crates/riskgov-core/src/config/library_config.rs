use serde::{Deserialize, Serialize};

use super::defaults;

/// Library generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Also select seed items whose industry tags overlap the organization's industry.
    pub match_industry_tags: bool,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            match_industry_tags: defaults::DEFAULT_MATCH_INDUSTRY_TAGS,
        }
    }
}
