//! Application entry points tying configuration, the API client, and the
//! export/sync runs together, plus the console banners and summaries.

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::*;

use crate::app_deps::{RealVariablesApiFactory, VariablesApiFactory};
use crate::cli::{Cli, Commands};
use crate::config::{ConnectionConfig, ExportConfig, SyncConfig};
use crate::exporter::{ExportReport, Exporter};
use crate::syncer::{SyncReport, Syncer};

pub struct App;

impl App {
    /// Run the parsed command and map its outcome to a process exit code.
    pub async fn run(cli: Cli) -> Result<ExitCode> {
        let complete = match cli.command {
            Commands::Export(args) => {
                let config = args.into_config(&cli.global);
                Self::export(&config).await?.is_complete()
            }
            Commands::Sync(args) => {
                let config = args.into_config(&cli.global);
                Self::sync(&config).await?.is_complete()
            }
        };

        Ok(if complete {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        })
    }

    pub async fn export(config: &ExportConfig) -> Result<ExportReport> {
        Self::export_with_deps(&RealVariablesApiFactory, config).await
    }

    pub async fn sync(config: &SyncConfig) -> Result<SyncReport> {
        Self::sync_with_deps(&RealVariablesApiFactory, config).await
    }

    pub async fn export_with_deps(
        factory: &dyn VariablesApiFactory,
        config: &ExportConfig,
    ) -> Result<ExportReport> {
        config.validate()?;
        println!("{}", connection_banner(&config.connection));

        let api = factory
            .create(&config.token, &config.connection)
            .context("Failed to initialize GitHub client")?;
        let report = Exporter::new(api.as_ref(), config)
            .run()
            .await
            .context("Failed to export variables")?;

        println!("{}", export_summary(&report));
        Ok(report)
    }

    pub async fn sync_with_deps(
        factory: &dyn VariablesApiFactory,
        config: &SyncConfig,
    ) -> Result<SyncReport> {
        config.validate()?;
        println!("{}", connection_banner(&config.connection));

        let api = factory
            .create(&config.token, &config.connection)
            .context("Failed to initialize GitHub client")?;
        let report = Syncer::new(api.as_ref(), config)
            .run()
            .await
            .context("Failed to sync variables")?;

        println!("{}", sync_summary(&report));
        Ok(report)
    }
}

/// Which instance is targeted and whether a proxy is in use.
pub fn connection_banner(connection: &ConnectionConfig) -> String {
    let host = match &connection.hostname {
        Some(url) => format!("Using GitHub Enterprise Server: {}", url),
        None => "Using GitHub.com".to_string(),
    };
    let proxy = if connection.proxy.is_configured() {
        "Proxy: Configured".green()
    } else {
        "Proxy: Not configured".dimmed()
    };
    format!("{}\n{}", host.cyan(), proxy)
}

pub fn export_summary(report: &ExportReport) -> String {
    if report.found_nothing() {
        let mut notice = "No variables found to export.".yellow().to_string();
        if report.repositories.failed > 0 {
            notice.push_str(&format!(
                "\n{}",
                format!(
                    "Failed to process: {} repositories",
                    report.repositories.failed
                )
                .red()
            ));
        }
        return notice;
    }

    let mut lines = vec![
        "Export Summary:".bold().to_string(),
        format!("Total repositories found: {}", report.repositories.total),
        format!(
            "Successfully processed: {} repositories",
            report.repositories.succeeded
        )
        .green()
        .to_string(),
        format!(
            "Failed to process: {} repositories",
            report.repositories.failed
        )
        .red()
        .to_string(),
        format!("Total variables exported: {}", report.variables_written),
    ];
    if let Some(path) = &report.output_path {
        lines.push(format!("Output file: {}", path.display()));
    }
    if let Some(err) = &report.organization_error {
        lines.push(
            format!("Organization variables were not exported: {}", err)
                .yellow()
                .to_string(),
        );
    }

    lines.push(String::new());
    if report.is_complete() {
        lines.push("Export completed successfully!".green().bold().to_string());
    } else {
        lines.push(
            format!(
                "Export completed with {} failed repositories. Some variables may not have been exported.",
                report.repositories.failed
            )
            .red()
            .bold()
            .to_string(),
        );
    }
    lines.join("\n")
}

pub fn sync_summary(report: &SyncReport) -> String {
    let stats = &report.stats;
    let mut lines = vec![
        "Sync Summary:".bold().to_string(),
        format!("Total variables processed: {}", stats.total),
        format!("Successfully created: {}", stats.succeeded)
            .green()
            .to_string(),
        format!("Failed: {}", stats.failed).red().to_string(),
        format!("Skipped: {}", stats.skipped).yellow().to_string(),
        String::new(),
    ];
    if report.is_complete() {
        lines.push("Sync completed successfully!".green().bold().to_string());
    } else {
        lines.push(
            format!("Sync completed with {} failed variables", stats.failed)
                .red()
                .bold()
                .to_string(),
        );
    }
    lines.join("\n")
}
