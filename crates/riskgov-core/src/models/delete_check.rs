use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Boolean-plus-reason answer of a `can_delete_*` check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeleteCheck {
    pub allowed: bool,
    /// Why deletion is refused. Always `None` when `allowed`.
    pub reason: Option<String>,
}

impl DeleteCheck {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
        }
    }
}
