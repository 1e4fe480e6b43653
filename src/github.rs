use reqwest::header::LINK;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::constants::api::{REPOSITORIES_PER_PAGE, VARIABLES_PER_PAGE};
use crate::constants::variables::ORGANIZATION_SCOPE;
use crate::errors::{GitHubError, MigrateError};
use crate::models::{
    ActionsVariables, CreateVariableRequest, RepositoryReference, RepositorySummary,
    VariableRecord,
};
use crate::retry::{RetryPolicy, retry_operation};
use crate::transport::{self, TransportConfig};
use crate::validation::{require, visibility_or_default};

/// Error body returned by the GitHub API on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    documentation_url: Option<String>,
}

/// Extract the `rel="next"` page number from a GitHub `Link` header.
///
/// GitHub Link headers look like:
/// `<https://api.github.com/organizations/1/repos?per_page=100&page=2>; rel="next", <...&page=5>; rel="last"`
pub fn next_page_from_link(link_header: &str) -> Option<u32> {
    link_header.split(',').find_map(|part| {
        let mut url = None;
        let mut is_next = false;
        for segment in part.split(';') {
            let segment = segment.trim();
            if let Some(inner) = segment.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
                url = Some(inner);
            } else if let Some(rel) = segment.strip_prefix("rel=") {
                is_next = rel.trim_matches('"') == "next";
            }
        }
        if !is_next {
            return None;
        }
        let query = url?.split_once('?')?.1;
        query
            .split('&')
            .find_map(|param| param.strip_prefix("page="))
            .and_then(|page| page.parse().ok())
    })
}

/// Client for the GitHub Actions variables and repositories endpoints.
///
/// Listing and creation calls are retried under the client's [`RetryPolicy`];
/// the repository existence check is not.
pub struct GitHubClient {
    http: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl GitHubClient {
    pub fn new(config: &TransportConfig, retry: RetryPolicy) -> Result<Self, MigrateError> {
        let http = transport::build_client(config)?;
        Ok(Self::with_http(http, config.base_url(), retry))
    }

    /// Wrap an already-built HTTP client pointed at `base_url`.
    pub fn with_http(http: Client, base_url: impl Into<String>, retry: RetryPolicy) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, GitHubError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ApiErrorBody>(&body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(GitHubError::ApiError {
            status_code: status.as_u16(),
            message,
            documentation_url: parsed.and_then(|b| b.documentation_url),
        })
    }

    /// Fetch every page of a listing, following the `Link` header.
    ///
    /// A `null` page body is an error: the listing cannot be trusted as complete.
    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        path: &str,
        per_page: u32,
        subject: &str,
    ) -> Result<Vec<T>, GitHubError> {
        let mut pages = Vec::new();
        let mut page = 1u32;

        loop {
            debug!("GET {} page {}", path, page);
            let request = self
                .http
                .get(self.url(path))
                .query(&[("per_page", per_page), ("page", page)]);
            let response = self.send(request).await?;

            let next = response
                .headers()
                .get(LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_page_from_link);

            let body: Option<T> = response.json().await?;
            let body = body.ok_or_else(|| {
                GitHubError::EmptyResponse(format!("no data returned for {}", subject))
            })?;
            pages.push(body);

            match next {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(pages)
    }

    async fn fetch_variables(
        &self,
        path: &str,
        scope: &str,
        subject: &str,
    ) -> Result<Vec<VariableRecord>, GitHubError> {
        let pages: Vec<ActionsVariables> = self
            .fetch_all_pages(path, VARIABLES_PER_PAGE, subject)
            .await?;

        Ok(pages
            .into_iter()
            .flat_map(|page| page.variables)
            .flatten()
            .filter_map(|variable| variable.into_record(scope))
            .collect())
    }

    async fn post_variable(
        &self,
        path: &str,
        body: &CreateVariableRequest<'_>,
    ) -> Result<(), GitHubError> {
        debug!("POST {} ({})", path, body.name);
        self.send(self.http.post(self.url(path)).json(body)).await?;
        Ok(())
    }

    /// Whether `org/repo` exists and is visible to the token.
    ///
    /// Any failure, including network errors, reads as "does not exist".
    pub async fn repository_exists(&self, org: &str, repo: &str) -> bool {
        let path = RepositoryReference::new(org, repo).api_path();
        match self.http.get(self.url(&path)).send().await {
            Ok(response) => response.status() == reqwest::StatusCode::OK,
            Err(e) => {
                debug!("existence check for {}/{} failed: {}", org, repo, e);
                false
            }
        }
    }

    /// All Actions variables defined on the organization.
    pub async fn list_org_variables(&self, org: &str) -> Result<Vec<VariableRecord>, MigrateError> {
        require(org, "organization name")?;

        let path = format!("/orgs/{}/actions/variables", org);
        let subject = format!("organization {}", org);
        retry_operation(
            &self.retry,
            format!("failed to fetch organization variables for {}", org),
            || self.fetch_variables(&path, ORGANIZATION_SCOPE, &subject),
        )
        .await
    }

    /// All Actions variables defined on one repository, scoped to its name.
    pub async fn list_repo_variables(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<VariableRecord>, MigrateError> {
        require(org, "organization name")?;
        require(repo, "repository name")?;

        let path = format!(
            "{}/actions/variables",
            RepositoryReference::new(org, repo).api_path()
        );
        let subject = format!("repository {}", repo);
        retry_operation(
            &self.retry,
            format!("failed to fetch repository variables for {}", repo),
            || self.fetch_variables(&path, repo, &subject),
        )
        .await
    }

    /// Names of every repository in the organization, in API order.
    ///
    /// The whole page walk is one retried unit: a failure on any page starts
    /// the listing again from page 1.
    pub async fn list_repositories(&self, org: &str) -> Result<Vec<String>, MigrateError> {
        require(org, "organization name")?;

        let path = format!("/orgs/{}/repos", org);
        let subject = format!("organization {}", org);
        let pages: Vec<Vec<Option<RepositorySummary>>> = retry_operation(
            &self.retry,
            format!("failed to list repositories for {}", org),
            || self.fetch_all_pages(&path, REPOSITORIES_PER_PAGE, &subject),
        )
        .await?;

        Ok(pages
            .into_iter()
            .flatten()
            .flatten()
            .filter_map(|repo| repo.name)
            .collect())
    }

    /// Create an organization variable. Existing variables are not checked for.
    pub async fn create_org_variable(
        &self,
        org: &str,
        name: &str,
        value: &str,
        visibility: &str,
    ) -> Result<(), MigrateError> {
        require(org, "organization name")?;
        require(name, "variable name")?;

        let path = format!("/orgs/{}/actions/variables", org);
        let body = CreateVariableRequest {
            name,
            value,
            visibility: visibility_or_default(visibility),
        };
        retry_operation(
            &self.retry,
            format!("failed to create org variable {}", name),
            || self.post_variable(&path, &body),
        )
        .await
    }

    /// Create a repository variable, failing with
    /// `MigrateError::RepositoryNotFound` when the repository is missing.
    pub async fn create_repo_variable(
        &self,
        org: &str,
        repo: &str,
        name: &str,
        value: &str,
        visibility: &str,
    ) -> Result<(), MigrateError> {
        require(org, "organization name")?;
        require(repo, "repository name")?;
        require(name, "variable name")?;

        if !self.repository_exists(org, repo).await {
            return Err(MigrateError::RepositoryNotFound {
                org: org.to_string(),
                repo: repo.to_string(),
            });
        }

        let path = format!(
            "{}/actions/variables",
            RepositoryReference::new(org, repo).api_path()
        );
        let body = CreateVariableRequest {
            name,
            value,
            visibility: visibility_or_default(visibility),
        };
        retry_operation(
            &self.retry,
            format!("failed to create repo variable {} in repo {}", name, repo),
            || self.post_variable(&path, &body),
        )
        .await
    }
}
