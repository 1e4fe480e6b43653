//! Input validation utilities.
//!
//! Checks applied before any remote call: required names and tokens must be
//! present, and a blank visibility falls back to the default.

use crate::constants::variables::{DEFAULT_VISIBILITY, VISIBILITIES};
use crate::errors::MigrateError;

/// Fail with a configuration error when `value` is empty or whitespace.
///
/// # Errors
///
/// Returns `MigrateError::Config` naming `what` as required.
pub fn require(value: &str, what: &str) -> Result<(), MigrateError> {
    if value.trim().is_empty() {
        return Err(MigrateError::config(format!("{} is required", what)));
    }
    Ok(())
}

/// Fail with a single configuration error listing every missing field.
pub fn require_all(fields: &[(&str, &str)]) -> Result<(), MigrateError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(value, _)| value.trim().is_empty())
        .map(|(_, what)| *what)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MigrateError::config(format!(
            "missing required values: {}",
            missing.join(", ")
        )))
    }
}

/// The visibility to send, defaulting blank values to `private`.
pub fn visibility_or_default(visibility: &str) -> &str {
    if visibility.trim().is_empty() {
        DEFAULT_VISIBILITY
    } else {
        visibility
    }
}

/// Whether `visibility` is one the Actions variables API knows.
///
/// Unknown values are still sent; the API decides whether to reject them.
pub fn is_known_visibility(visibility: &str) -> bool {
    VISIBILITIES.iter().any(|known| *known == visibility)
}
