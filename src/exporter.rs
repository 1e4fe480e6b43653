//! Export: organization and repository variables into a CSV artifact.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::app_deps::VariablesApi;
use crate::config::ExportConfig;
use crate::csv_file;
use crate::errors::MigrateError;
use crate::models::{RunStatistics, VariableRecord};

/// Outcome of an export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Per-repository counters; `total` is the number of repositories found.
    pub repositories: RunStatistics,
    pub organization_variables: usize,
    pub variables_written: usize,
    /// Set when a CSV was written.
    pub output_path: Option<PathBuf>,
    /// Why organization variables are missing from the export, if they are.
    pub organization_error: Option<String>,
}

impl ExportReport {
    /// Whether anything was found to export.
    pub fn found_nothing(&self) -> bool {
        self.variables_written == 0 && self.output_path.is_none()
    }

    /// A run is complete when no repository failed. An export that found
    /// nothing ends with a notice and counts as complete either way.
    pub fn is_complete(&self) -> bool {
        self.found_nothing() || !self.repositories.has_failures()
    }
}

/// Runs one export against a [`VariablesApi`].
pub struct Exporter<'a> {
    api: &'a dyn VariablesApi,
    config: &'a ExportConfig,
}

impl<'a> Exporter<'a> {
    pub fn new(api: &'a dyn VariablesApi, config: &'a ExportConfig) -> Self {
        Self { api, config }
    }

    /// Collect every variable and write the CSV.
    ///
    /// Organization variables are best-effort and a failing repository is
    /// counted and skipped; only a missing repository list aborts the run.
    /// No file is written when nothing was found.
    pub async fn run(&self) -> Result<ExportReport, MigrateError> {
        self.config.validate()?;
        let org = self.config.organization.as_str();

        let mut batch: Vec<VariableRecord> = Vec::new();
        let mut organization_error = None;

        info!("Fetching organization variables for {}", org);
        match self.api.list_org_variables(org).await {
            Ok(variables) => {
                info!("Found {} organization variables", variables.len());
                batch.extend(variables);
            }
            Err(e) => {
                warn!("Failed to fetch organization variables: {}", e);
                organization_error = Some(e.to_string());
            }
        }
        let organization_variables = batch.len();

        info!("Fetching repository list for {}", org);
        let repos = self.api.list_repositories(org).await?;
        info!("Found {} repositories", repos.len());

        let mut repositories = RunStatistics::default();
        for repo in &repos {
            match self.api.list_repo_variables(org, repo).await {
                Ok(variables) => {
                    info!("Found {} variables in repository {}", variables.len(), repo);
                    batch.extend(variables);
                    repositories.record_success();
                }
                Err(e) => {
                    warn!("Failed to fetch variables for repo {}: {}", repo, e);
                    repositories.record_failure();
                }
            }
        }

        let mut report = ExportReport {
            repositories,
            organization_variables,
            variables_written: 0,
            output_path: None,
            organization_error,
        };

        if batch.is_empty() {
            info!("No variables found to export");
            return Ok(report);
        }

        let output_path = self.config.output_path();
        report.variables_written = csv_file::write_variables(&output_path, &batch)?;
        report.output_path = Some(output_path);
        Ok(report)
    }
}
