mod admin_error;
mod governance_error;
mod storage_error;

pub use admin_error::AdminError;
pub use governance_error::GovernanceError;
pub use storage_error::StorageError;

/// Top-level error for every riskgov operation.
#[derive(Debug, thiserror::Error)]
pub enum RiskGovError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("validation failed on {field}: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("governance error: {0}")]
    GovernanceError(#[from] GovernanceError),

    #[error("admin error: {0}")]
    AdminError(#[from] AdminError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl RiskGovError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a `ValidationError`.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type RiskGovResult<T> = Result<T, RiskGovError>;
