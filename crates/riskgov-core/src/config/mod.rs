//! Layered configuration loaded from TOML. Every section falls back to
//! the values in [`defaults`].

mod admin_config;
pub mod defaults;
mod governance_config;
mod library_config;
mod observability_config;
mod storage_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use admin_config::AdminConfig;
pub use governance_config::GovernanceConfig;
pub use library_config::LibraryConfig;
pub use observability_config::ObservabilityConfig;
pub use storage_config::StorageConfig;

use crate::errors::{RiskGovError, RiskGovResult};

/// Root configuration for the whole workspace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskGovConfig {
    pub storage: StorageConfig,
    pub governance: GovernanceConfig,
    pub admin: AdminConfig,
    pub library: LibraryConfig,
    pub observability: ObservabilityConfig,
}

impl RiskGovConfig {
    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn from_toml(input: &str) -> RiskGovResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| RiskGovError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file on disk.
    pub fn from_file(path: &Path) -> RiskGovResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| RiskGovError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> RiskGovResult<()> {
        if self.storage.read_pool_size == 0 {
            return Err(RiskGovError::ConfigError(
                "storage.read_pool_size must be at least 1".to_string(),
            ));
        }
        if self.admin.invitation_ttl_days == 0 {
            return Err(RiskGovError::ConfigError(
                "admin.invitation_ttl_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
