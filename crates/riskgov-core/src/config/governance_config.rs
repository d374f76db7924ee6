use serde::{Deserialize, Serialize};

use super::defaults;

/// Appetite and tolerance governance configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    /// When false, a statement's creator may not approve it.
    pub allow_self_approval: bool,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            allow_self_approval: defaults::DEFAULT_ALLOW_SELF_APPROVAL,
        }
    }
}
