//! Run configuration.
//!
//! Every value the export and sync operations need is collected once at
//! startup into an [`ExportConfig`] or [`SyncConfig`] and passed down by
//! reference. Nothing below this module reads the process environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants;
use crate::errors::MigrateError;
use crate::retry::RetryPolicy;
use crate::transport::{ProxyConfig, TransportConfig, normalize_hostname};
use crate::validation::require_all;

/// How to reach the GitHub instance, shared by export and sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Normalized enterprise API URL; `None` targets GitHub.com.
    pub hostname: Option<String>,
    pub proxy: ProxyConfig,
    pub retry: RetryPolicy,
    pub timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            hostname: None,
            proxy: ProxyConfig::default(),
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(constants::api::REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ConnectionConfig {
    /// Set the enterprise hostname, normalizing it to an API base URL.
    pub fn with_hostname(mut self, hostname: Option<&str>) -> Self {
        self.hostname = hostname.and_then(normalize_hostname);
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Transport settings for a client authenticated with `token`.
    pub fn transport(&self, token: &str) -> TransportConfig {
        TransportConfig {
            token: token.to_string(),
            hostname: self.hostname.clone(),
            proxy: self.proxy.clone(),
            timeout: self.timeout,
        }
    }
}

/// Inputs of an export run.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub organization: String,
    pub token: String,
    /// Output file is `<prefix>_variables.csv`.
    pub output_prefix: String,
    pub connection: ConnectionConfig,
}

impl ExportConfig {
    pub fn validate(&self) -> Result<(), MigrateError> {
        require_all(&[
            (self.organization.as_str(), "source organization"),
            (self.token.as_str(), "source token"),
            (self.output_prefix.as_str(), "output file prefix"),
        ])
    }

    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}{}",
            self.output_prefix,
            constants::csv::OUTPUT_SUFFIX
        ))
    }
}

/// Inputs of a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub mapping_file: PathBuf,
    pub organization: String,
    pub token: String,
    pub connection: ConnectionConfig,
}

impl SyncConfig {
    pub fn validate(&self) -> Result<(), MigrateError> {
        let mapping_file = self.mapping_file.to_string_lossy();
        require_all(&[
            (&*mapping_file, "mapping file"),
            (self.organization.as_str(), "target organization"),
            (self.token.as_str(), "target token"),
        ])
    }
}

/// Load `.env` from the working directory, if there is one.
///
/// Returns the path that was loaded. Variables already set in the
/// environment win over the file.
pub fn load_env_file() -> Result<Option<PathBuf>, MigrateError> {
    load_env_file_from(Path::new(".env"))
}

/// Runs before logging is set up, so a malformed file is returned to the
/// caller rather than logged here.
pub fn load_env_file_from(path: &Path) -> Result<Option<PathBuf>, MigrateError> {
    if !path.exists() {
        return Ok(None);
    }
    dotenv::from_path(path).map_err(|e| {
        MigrateError::config(format!("failed to read {}: {}", path.display(), e))
    })?;
    Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_config() -> ExportConfig {
        ExportConfig {
            organization: "acme".to_string(),
            token: "ghp_token".to_string(),
            output_prefix: "acme".to_string(),
            connection: ConnectionConfig::default(),
        }
    }

    #[test]
    fn test_export_output_path() {
        assert_eq!(export_config().output_path(), PathBuf::from("acme_variables.csv"));
    }

    #[test]
    fn test_export_validate() {
        assert!(export_config().validate().is_ok());

        let mut config = export_config();
        config.output_prefix = String::new();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MigrateError::Config(_)));
        assert!(err.to_string().contains("output file prefix"));
    }

    #[test]
    fn test_sync_validate() {
        let config = SyncConfig {
            mapping_file: PathBuf::new(),
            organization: "acme2".to_string(),
            token: String::new(),
            connection: ConnectionConfig::default(),
        };
        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("mapping file"));
        assert!(msg.contains("target token"));
        assert!(!msg.contains("target organization"));
    }

    #[test]
    fn test_connection_normalizes_hostname() {
        let connection = ConnectionConfig::default().with_hostname(Some("ghe.example.com/"));
        assert_eq!(
            connection.hostname.as_deref(),
            Some("https://ghe.example.com/api/v3")
        );

        let connection = ConnectionConfig::default().with_hostname(Some(""));
        assert_eq!(connection.hostname, None);
    }

    #[test]
    fn test_transport_carries_connection_settings() {
        let connection = ConnectionConfig::default()
            .with_hostname(Some("ghe.example.com"))
            .with_proxy(ProxyConfig::new(None, Some("http://proxy:8080".into()), None));
        let transport = connection.transport("ghp_token");
        assert_eq!(transport.token, "ghp_token");
        assert_eq!(transport.base_url(), "https://ghe.example.com/api/v3");
        assert!(transport.proxy.is_configured());
        assert_eq!(transport.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_env_file_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_env_file_from(&dir.path().join(".env")).unwrap().is_none());
    }

    #[test]
    fn test_load_env_file_malformed_is_reported() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "GHMV_NOT A VALID LINE\n").unwrap();

        let err = load_env_file_from(&path).unwrap_err();
        assert!(matches!(err, MigrateError::Config(_)));
        assert!(err.to_string().contains(".env"));
    }
}
