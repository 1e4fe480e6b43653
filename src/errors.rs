use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub API error (status {status_code}): {message}")]
    ApiError {
        status_code: u16,
        message: String,
        documentation_url: Option<String>,
    },
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("URI error: {0}")]
    UriError(String),
    #[error("Failed to decode response: {0}")]
    DecodeError(String),
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl GitHubError {
    /// HTTP status code of the failed call, when the API answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GitHubError::ApiError { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            GitHubError::UriError(err.to_string())
        } else if err.is_decode() {
            GitHubError::DecodeError(err.to_string())
        } else if let Some(status) = err.status() {
            GitHubError::ApiError {
                status_code: status.as_u16(),
                message: err.to_string(),
                documentation_url: None,
            }
        } else {
            GitHubError::HttpError(err.to_string())
        }
    }
}

/// Errors surfaced by the export and sync operations.
#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Authentication error: {0}")]
    Auth(String),
    #[error("{context} after {attempts} attempts: {source}")]
    Remote {
        context: String,
        attempts: u32,
        #[source]
        source: GitHubError,
    },
    #[error("repository {repo} does not exist in organization {org}")]
    RepositoryNotFound { org: String, repo: String },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl MigrateError {
    /// Whether this error marks a missing target repository, which a sync
    /// counts as skipped rather than failed.
    pub fn is_repository_not_found(&self) -> bool {
        matches!(self, MigrateError::RepositoryNotFound { .. })
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        MigrateError::Config(message.into())
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        MigrateError::Csv {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_not_found_message_is_stable() {
        let err = MigrateError::RepositoryNotFound {
            org: "acme".to_string(),
            repo: "ghost-repo".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "repository ghost-repo does not exist in organization acme"
        );
        assert!(err.is_repository_not_found());
    }

    #[test]
    fn test_remote_error_carries_attempts_and_source() {
        let err = MigrateError::Remote {
            context: "failed to create org variable FOO".to_string(),
            attempts: 3,
            source: GitHubError::ApiError {
                status_code: 422,
                message: "Already exists".to_string(),
                documentation_url: None,
            },
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to create org variable FOO after 3 attempts"));
        assert!(msg.contains("422"));
        assert!(!err.is_repository_not_found());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_status_code_only_for_api_errors() {
        let api = GitHubError::ApiError {
            status_code: 404,
            message: "Not Found".to_string(),
            documentation_url: None,
        };
        assert_eq!(api.status_code(), Some(404));
        assert_eq!(GitHubError::HttpError("reset".to_string()).status_code(), None);
    }
}
