//! Input checks applied before anything reaches storage.

use riskgov_core::constants::MAX_NAME_LEN;
use riskgov_core::errors::{RiskGovError, RiskGovResult};

/// Trimmed `value`, or a validation error when it is blank or too long.
pub(crate) fn required_text<'a>(
    field: &str,
    value: &'a str,
    max_len: usize,
) -> RiskGovResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RiskGovError::validation(field, "must not be blank"));
    }
    if trimmed.chars().count() > max_len {
        return Err(RiskGovError::validation(
            field,
            format!("must be at most {max_len} characters"),
        ));
    }
    Ok(trimmed)
}

pub(crate) fn name(field: &str, value: &str) -> RiskGovResult<String> {
    required_text(field, value, MAX_NAME_LEN).map(str::to_string)
}

pub(crate) fn finite(field: &str, value: f64) -> RiskGovResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(RiskGovError::validation(field, "must be a finite number"))
    }
}
