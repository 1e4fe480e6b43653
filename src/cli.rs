//! Command-line interface.
//!
//! Every flag can also come from the environment (or a `.env` file loaded
//! before parsing), using the `GHMV_` names for per-command values and the
//! conventional proxy variables for proxy settings.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConnectionConfig, ExportConfig, SyncConfig};
use crate::constants;
use crate::retry::RetryPolicy;
use crate::transport::ProxyConfig;

#[derive(Parser, Debug)]
#[command(
    name = "gh-migrate-variables",
    version,
    about = "Migrate GitHub Actions variables between organizations"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// HTTP proxy for http:// requests
    #[arg(long, env = "HTTP_PROXY", global = true)]
    pub http_proxy: Option<String>,

    /// HTTPS proxy for https:// requests
    #[arg(long, env = "HTTPS_PROXY", global = true)]
    pub https_proxy: Option<String>,

    /// Comma-separated hosts that bypass the proxy
    #[arg(long, env = "NO_PROXY", global = true)]
    pub no_proxy: Option<String>,

    /// Maximum attempts per API call
    #[arg(long, env = "RETRY_MAX", global = true, default_value_t = constants::retry::MAX_ATTEMPTS)]
    pub retry_max: u32,

    /// Delay before the first retry, doubled on each further retry (e.g. 1s, 500ms)
    #[arg(long, env = "RETRY_DELAY", global = true, default_value = "1s", value_parser = parse_delay)]
    pub retry_delay: Duration,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Creates a CSV file of the organization and repository variables
    Export(ExportArgs),
    /// Syncs variables from a CSV file to a target organization
    Sync(SyncArgs),
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Organization to export
    #[arg(short, long, env = "GHMV_SOURCE_ORGANIZATION")]
    pub organization: String,

    /// GitHub token
    #[arg(short, long, env = "GHMV_SOURCE_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Output filename prefix (defaults to the organization name)
    #[arg(short, long, env = "GHMV_OUTPUT_FILE")]
    pub file_prefix: Option<String>,

    /// GitHub Enterprise Server hostname URL, e.g. https://github.example.com
    #[arg(short = 'n', long, env = "GHMV_SOURCE_HOSTNAME")]
    pub hostname: Option<String>,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// CSV mapping file to sync variables from
    #[arg(short = 'f', long, env = "GHMV_MAPPING_FILE")]
    pub file_mapping: PathBuf,

    /// Target organization to sync variables to
    #[arg(short = 'o', long, env = "GHMV_TARGET_ORGANIZATION")]
    pub target_organization: String,

    /// Target organization token (scope: admin:org)
    #[arg(short = 't', long, env = "GHMV_TARGET_TOKEN", hide_env_values = true)]
    pub target_token: String,

    /// GitHub Enterprise Server hostname URL, e.g. https://github.example.com
    #[arg(short = 'n', long, env = "GHMV_TARGET_HOSTNAME")]
    pub hostname: Option<String>,
}

impl GlobalArgs {
    pub fn connection(&self, hostname: Option<&str>) -> ConnectionConfig {
        ConnectionConfig::default()
            .with_hostname(hostname)
            .with_proxy(ProxyConfig::new(
                self.http_proxy.clone(),
                self.https_proxy.clone(),
                self.no_proxy.clone(),
            ))
            .with_retry(RetryPolicy::new(self.retry_max, self.retry_delay))
    }
}

impl ExportArgs {
    pub fn into_config(self, global: &GlobalArgs) -> ExportConfig {
        let connection = global.connection(self.hostname.as_deref());
        let output_prefix = self
            .file_prefix
            .filter(|prefix| !prefix.trim().is_empty())
            .unwrap_or_else(|| self.organization.clone());
        ExportConfig {
            organization: self.organization,
            token: self.token,
            output_prefix,
            connection,
        }
    }
}

impl SyncArgs {
    pub fn into_config(self, global: &GlobalArgs) -> SyncConfig {
        SyncConfig {
            connection: global.connection(self.hostname.as_deref()),
            mapping_file: self.file_mapping,
            organization: self.target_organization,
            token: self.target_token,
        }
    }
}

/// Parse a delay such as `2`, `2s`, `1.5s` or `500ms`. Bare numbers are seconds.
pub fn parse_delay(raw: &str) -> Result<Duration, String> {
    let raw = raw.trim();
    let (number, millis) = if let Some(n) = raw.strip_suffix("ms") {
        (n, true)
    } else if let Some(n) = raw.strip_suffix('s') {
        (n, false)
    } else {
        (raw, false)
    };

    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| format!("invalid delay '{}': expected e.g. 1s or 500ms", raw))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("invalid delay '{}': must be a non-negative number", raw));
    }

    let secs = if millis { value / 1000.0 } else { value };
    let delay = Duration::try_from_secs_f64(secs)
        .map_err(|e| format!("invalid delay '{}': {}", raw, e))?;
    if delay > Duration::from_secs(constants::retry::MAX_DELAY_SECS) {
        return Err(format!(
            "invalid delay '{}': must be at most {}s",
            raw,
            constants::retry::MAX_DELAY_SECS
        ));
    }
    Ok(delay)
}
