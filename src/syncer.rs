//! Sync: replay a variables CSV as creation calls against a target organization.

use tracing::{info, warn};

use crate::app_deps::VariablesApi;
use crate::config::SyncConfig;
use crate::csv_file::{self, MappingRow};
use crate::errors::MigrateError;
use crate::models::{RunStatistics, VariableRecord, VariableTarget};
use crate::validation::is_known_visibility;

/// Outcome of one row of the mapping file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    /// Target repository missing, or the row was malformed.
    Skipped(String),
    Failed(String),
}

/// Outcome of a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub stats: RunStatistics,
    /// Variable name (or row description) and its outcome, in file order.
    pub outcomes: Vec<(String, SyncOutcome)>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        !self.stats.has_failures()
    }

    fn record(&mut self, label: String, outcome: SyncOutcome) {
        match &outcome {
            SyncOutcome::Created => self.stats.record_success(),
            SyncOutcome::Skipped(_) => self.stats.record_skip(),
            SyncOutcome::Failed(_) => self.stats.record_failure(),
        }
        self.outcomes.push((label, outcome));
    }
}

/// Runs one sync against a [`VariablesApi`].
pub struct Syncer<'a> {
    api: &'a dyn VariablesApi,
    config: &'a SyncConfig,
}

impl<'a> Syncer<'a> {
    pub fn new(api: &'a dyn VariablesApi, config: &'a SyncConfig) -> Self {
        Self { api, config }
    }

    /// Create every variable listed in the mapping file, one row at a time.
    ///
    /// Row failures never stop the run; only an unreadable file or missing
    /// configuration does.
    pub async fn run(&self) -> Result<SyncReport, MigrateError> {
        self.config.validate()?;
        let rows = csv_file::read_mapping(&self.config.mapping_file)?;
        info!(
            "Read {} rows from {}",
            rows.len(),
            self.config.mapping_file.display()
        );

        let mut report = SyncReport::default();
        for row in rows {
            match row {
                MappingRow::Malformed { line, fields } => {
                    warn!(
                        "Row {} has {} columns, expected 4. Skipping: {:?}",
                        line,
                        fields.len(),
                        fields
                    );
                    report.record(
                        format!("row {}", line),
                        SyncOutcome::Skipped("not enough columns".to_string()),
                    );
                }
                MappingRow::Variable(variable) => {
                    let outcome = self.create(&variable).await;
                    report.record(variable.name, outcome);
                }
            }
        }

        Ok(report)
    }

    async fn create(&self, variable: &VariableRecord) -> SyncOutcome {
        let org = self.config.organization.as_str();
        if !variable.visibility.is_empty() && !is_known_visibility(&variable.visibility) {
            warn!(
                "Variable {} has unrecognized visibility '{}'",
                variable.name, variable.visibility
            );
        }

        let result = match variable.target() {
            VariableTarget::Organization => {
                self.api
                    .create_org_variable(org, &variable.name, &variable.value, &variable.visibility)
                    .await
            }
            VariableTarget::Repository(repo) => {
                self.api
                    .create_repo_variable(
                        org,
                        repo,
                        &variable.name,
                        &variable.value,
                        &variable.visibility,
                    )
                    .await
            }
        };

        match result {
            Ok(()) => {
                info!("Created variable {} ({})", variable.name, variable.scope);
                SyncOutcome::Created
            }
            Err(e) if e.is_repository_not_found() => {
                warn!("Skipping variable {}: {}", variable.name, e);
                SyncOutcome::Skipped(e.to_string())
            }
            Err(e) => {
                warn!("Error creating variable {}: {}", variable.name, e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }
}
