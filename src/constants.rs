//! Application constants for API endpoints, retry policy, and the CSV artifact.
//!
//! This module contains all constant values used throughout the application,
//! including GitHub API endpoints, pagination sizes, retry parameters, and
//! the literal tags written to and read from the variables CSV.

/// GitHub API endpoint constants.
pub mod api {
    /// Public GitHub API endpoint, used when no enterprise hostname is configured.
    pub const GITHUB_API_URL: &str = "https://api.github.com";

    /// Path suffix of the REST API on a GitHub Enterprise Server instance.
    pub const ENTERPRISE_API_SUFFIX: &str = "/api/v3";

    /// Media type requested for every call.
    pub const ACCEPT: &str = "application/vnd.github+json";

    /// REST API version pinned on every call.
    pub const API_VERSION: &str = "2022-11-28";

    /// User agent sent with every call (GitHub rejects requests without one).
    pub const USER_AGENT: &str = concat!("gh-migrate-variables/", env!("CARGO_PKG_VERSION"));

    /// Page size for repository listings (GitHub maximum).
    pub const REPOSITORIES_PER_PAGE: u32 = 100;

    /// Page size for variable listings (GitHub maximum for the variables API).
    pub const VARIABLES_PER_PAGE: u32 = 30;

    /// Default per-request timeout, in seconds.
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Retry policy constants.
pub mod retry {
    /// Maximum number of attempts for a remote operation, including the first.
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Delay before the second attempt; doubles before each further attempt.
    pub const BASE_DELAY_SECS: u64 = 1;

    /// Largest base delay accepted from the command line (one day).
    pub const MAX_DELAY_SECS: u64 = 86_400;
}

/// Variable record constants.
pub mod variables {
    /// Scope tag marking an organization-level variable.
    pub const ORGANIZATION_SCOPE: &str = "organization";

    /// Visibility applied when a variable carries none.
    pub const DEFAULT_VISIBILITY: &str = "private";

    /// Visibility values accepted by the GitHub Actions variables API.
    pub const VISIBILITIES: [&str; 3] = ["private", "all", "selected"];
}

/// CSV artifact constants.
pub mod csv {
    /// Header row of the export artifact, in column order.
    pub const HEADER: [&str; 4] = ["Name", "Value", "Scope", "Visibility"];

    /// Number of columns a sync row needs to be usable.
    pub const REQUIRED_COLUMNS: usize = 4;

    /// Suffix appended to the output prefix to form the export file name.
    pub const OUTPUT_SUFFIX: &str = "_variables.csv";
}
