//! Error formatting utilities.
//!
//! This module provides helper functions for formatting error chains
//! into human-readable messages.

use std::error::Error;

/// Format an error and its source chain into a single line.
///
/// Messages are joined with " → ". A source whose text is already part of
/// the previous message (as with `MigrateError::Remote`, which embeds its
/// cause) is not repeated.
///
/// # Example
///
/// ```
/// use gh_migrate_variables::error::format_error_chain;
///
/// let err = anyhow::anyhow!("connection refused").context("failed to sync variables");
/// let formatted = format_error_chain(err.as_ref());
/// assert_eq!(formatted, "failed to sync variables → connection refused");
/// ```
pub fn format_error_chain(error: &(dyn Error + 'static)) -> String {
    let mut error_chain = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        let message = err.to_string();
        let repeated = error_chain
            .last()
            .is_some_and(|previous| previous.contains(&message));
        if !repeated {
            error_chain.push(message);
        }
        current = err.source();
    }
    error_chain.join(" → ")
}
