//! Email shape validation. Deliverability is not checked.

use std::sync::LazyLock;

use regex::Regex;
use riskgov_core::errors::{AdminError, RiskGovResult};

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$").ok()
});

pub fn is_valid_email(email: &str) -> bool {
    match EMAIL_RE.as_ref() {
        Some(re) => email.len() <= 254 && re.is_match(email),
        None => false,
    }
}

/// Trimmed, lowercased address or `InvalidEmail`.
pub fn normalize_email(email: &str) -> RiskGovResult<String> {
    let trimmed = email.trim();
    if !is_valid_email(trimmed) {
        return Err(AdminError::InvalidEmail(trimmed.to_string()).into());
    }
    Ok(trimmed.to_lowercase())
}
