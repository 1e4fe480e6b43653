use std::process::ExitCode;

use clap::Parser;
use colored::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gh_migrate_variables::app::App;
use gh_migrate_variables::cli::Cli;
use gh_migrate_variables::config;
use gh_migrate_variables::error::format_error_chain;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("gh_migrate_variables={}", default_level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = config::load_env_file();
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    match env_file {
        Ok(Some(path)) => tracing::info!("Using {} for configuration", path.display()),
        Ok(None) => tracing::info!("Using flags and/or environment variables"),
        Err(e) => tracing::warn!("{}", e),
    }

    match App::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), format_error_chain(e.as_ref()));
            ExitCode::FAILURE
        }
    }
}
