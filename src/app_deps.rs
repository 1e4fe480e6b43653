use async_trait::async_trait;

use crate::config::ConnectionConfig;
use crate::errors::MigrateError;
use crate::github::GitHubClient;
use crate::models::VariableRecord;

/// Remote operations the exporter and syncer depend on.
#[async_trait]
pub trait VariablesApi: Send + Sync {
    async fn repository_exists(&self, org: &str, repo: &str) -> bool;
    async fn list_org_variables(&self, org: &str) -> Result<Vec<VariableRecord>, MigrateError>;
    async fn list_repo_variables(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<VariableRecord>, MigrateError>;
    async fn list_repositories(&self, org: &str) -> Result<Vec<String>, MigrateError>;
    async fn create_org_variable(
        &self,
        org: &str,
        name: &str,
        value: &str,
        visibility: &str,
    ) -> Result<(), MigrateError>;
    async fn create_repo_variable(
        &self,
        org: &str,
        repo: &str,
        name: &str,
        value: &str,
        visibility: &str,
    ) -> Result<(), MigrateError>;
}

pub trait VariablesApiFactory: Send + Sync {
    fn create(
        &self,
        token: &str,
        connection: &ConnectionConfig,
    ) -> Result<Box<dyn VariablesApi>, MigrateError>;
}

#[async_trait]
impl VariablesApi for GitHubClient {
    async fn repository_exists(&self, org: &str, repo: &str) -> bool {
        GitHubClient::repository_exists(self, org, repo).await
    }

    async fn list_org_variables(&self, org: &str) -> Result<Vec<VariableRecord>, MigrateError> {
        GitHubClient::list_org_variables(self, org).await
    }

    async fn list_repo_variables(
        &self,
        org: &str,
        repo: &str,
    ) -> Result<Vec<VariableRecord>, MigrateError> {
        GitHubClient::list_repo_variables(self, org, repo).await
    }

    async fn list_repositories(&self, org: &str) -> Result<Vec<String>, MigrateError> {
        GitHubClient::list_repositories(self, org).await
    }

    async fn create_org_variable(
        &self,
        org: &str,
        name: &str,
        value: &str,
        visibility: &str,
    ) -> Result<(), MigrateError> {
        GitHubClient::create_org_variable(self, org, name, value, visibility).await
    }

    async fn create_repo_variable(
        &self,
        org: &str,
        repo: &str,
        name: &str,
        value: &str,
        visibility: &str,
    ) -> Result<(), MigrateError> {
        GitHubClient::create_repo_variable(self, org, repo, name, value, visibility).await
    }
}

pub struct RealVariablesApiFactory;

impl VariablesApiFactory for RealVariablesApiFactory {
    fn create(
        &self,
        token: &str,
        connection: &ConnectionConfig,
    ) -> Result<Box<dyn VariablesApi>, MigrateError> {
        let client = GitHubClient::new(&connection.transport(token), connection.retry)?;
        Ok(Box::new(client))
    }
}
