//! # gh-migrate-variables
//!
//! Migrates GitHub Actions configuration variables between organizations,
//! for example from GitHub.com to GitHub Enterprise Server.
//!
//! Two operations are provided:
//! - **export** reads every organization and repository variable of a source
//!   organization into `<prefix>_variables.csv`
//! - **sync** reads such a file and creates the variables in a target
//!   organization
//!
//! ## Modules
//!
//! - [`transport`] - Authenticated HTTP client, hostname normalization, proxy selection
//! - [`retry`] - Bounded exponential-backoff retry
//! - [`github`] - GitHub Actions variables and repositories accessor
//! - [`app_deps`] - Trait seams over the accessor for testing
//! - [`exporter`] / [`syncer`] - Export and sync orchestration
//! - [`csv_file`] - Variables CSV reading and writing
//! - [`config`] / [`cli`] - Run configuration and command-line parsing
//! - [`errors`] - Structured error types
//! - [`error`] - Error formatting utilities
//! - [`constants`] - Application constants

pub mod app;
pub mod app_deps;
pub mod cli;
pub mod config;
pub mod constants;
pub mod csv_file;
pub mod error;
pub mod errors;
pub mod exporter;
pub mod github;
pub mod models;
pub mod retry;
pub mod syncer;
pub mod transport;
pub mod validation;
