use serde::{Deserialize, Serialize};

use super::defaults;

/// User administration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Days before a pending invitation expires.
    pub invitation_ttl_days: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            invitation_ttl_days: defaults::DEFAULT_INVITATION_TTL_DAYS,
        }
    }
}
