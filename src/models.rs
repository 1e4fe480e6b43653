//! Data moved between the GitHub API and the variables CSV.

use serde::{Deserialize, Serialize};

use crate::constants::variables::{DEFAULT_VISIBILITY, ORGANIZATION_SCOPE};

/// One Actions variable, either organization-wide or bound to a repository.
///
/// Field names serialize to the CSV header `Name,Value,Scope,Visibility`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VariableRecord {
    pub name: String,
    pub value: String,
    /// Either `organization` or the name of a repository.
    pub scope: String,
    pub visibility: String,
}

impl VariableRecord {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        scope: impl Into<String>,
        visibility: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            scope: scope.into(),
            visibility: visibility.into(),
        }
    }

    /// Where a sync should create this variable.
    pub fn target(&self) -> VariableTarget<'_> {
        if self.scope == ORGANIZATION_SCOPE {
            VariableTarget::Organization
        } else {
            VariableTarget::Repository(&self.scope)
        }
    }
}

/// Creation target derived from a record's scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableTarget<'a> {
    Organization,
    Repository(&'a str),
}

/// Organization and repository name pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl RepositoryReference {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// API path of the repository, `/repos/{owner}/{name}`.
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.name)
    }
}

/// Counters kept by an export or sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunStatistics {
    pub fn record_success(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.failed += 1;
    }

    pub fn record_skip(&mut self) {
        self.total += 1;
        self.skipped += 1;
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// A variable as returned by the list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ActionsVariable {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub visibility: Option<String>,
}

impl ActionsVariable {
    /// Normalize into a record under `scope`; nameless variables are dropped.
    pub(crate) fn into_record(self, scope: &str) -> Option<VariableRecord> {
        if self.name.is_empty() {
            return None;
        }
        let visibility = self
            .visibility
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_VISIBILITY.to_string());
        Some(VariableRecord::new(self.name, self.value, scope, visibility))
    }
}

/// Body of `GET /orgs/{org}/actions/variables` and its repository twin.
#[derive(Debug, Deserialize)]
pub(crate) struct ActionsVariables {
    #[serde(default)]
    pub variables: Vec<Option<ActionsVariable>>,
}

/// The only repository field the listing needs.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositorySummary {
    pub name: Option<String>,
}

/// Body of the create-variable endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct CreateVariableRequest<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub visibility: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_routes_on_scope() {
        let org = VariableRecord::new("FOO", "bar", "organization", "private");
        assert_eq!(org.target(), VariableTarget::Organization);

        let repo = VariableRecord::new("BAZ", "qux", "widget", "private");
        assert_eq!(repo.target(), VariableTarget::Repository("widget"));

        // Only the exact lowercase tag means organization.
        let odd = VariableRecord::new("X", "y", "Organization", "all");
        assert_eq!(odd.target(), VariableTarget::Repository("Organization"));
    }

    #[test]
    fn test_into_record_defaults_visibility() {
        let var = ActionsVariable {
            name: "FOO".to_string(),
            value: "bar".to_string(),
            visibility: None,
        };
        assert_eq!(
            var.into_record("organization"),
            Some(VariableRecord::new("FOO", "bar", "organization", "private"))
        );

        let blank = ActionsVariable {
            name: "FOO".to_string(),
            value: String::new(),
            visibility: Some(String::new()),
        };
        assert_eq!(blank.into_record("widget").unwrap().visibility, "private");
    }

    #[test]
    fn test_into_record_drops_nameless() {
        let var = ActionsVariable {
            name: String::new(),
            value: "orphan".to_string(),
            visibility: Some("all".to_string()),
        };
        assert!(var.into_record("organization").is_none());
    }

    #[test]
    fn test_statistics_counters() {
        let mut stats = RunStatistics::default();
        stats.record_success();
        stats.record_skip();
        stats.record_failure();
        stats.record_success();
        assert_eq!(
            stats,
            RunStatistics {
                total: 4,
                succeeded: 2,
                failed: 1,
                skipped: 1,
            }
        );
        assert!(stats.has_failures());
    }

    #[test]
    fn test_repository_reference_api_path() {
        let repo = RepositoryReference::new("acme", "widget");
        assert_eq!(repo.api_path(), "/repos/acme/widget");
    }
}
