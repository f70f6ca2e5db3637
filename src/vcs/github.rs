//! HTTP client for the GitHub pull request API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Hosting, PullRequest, VcsError};
use crate::config::HostingConfig;

const USER_AGENT: &str = concat!("bookwright/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct CreatePullBody<'a> {
    title: &'a str,
    body: &'a str,
    head: &'a str,
    base: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreatedPull {
    html_url: String,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_url: String,
    token: Option<String>,
    client: Client,
}

impl GitHubClient {
    pub fn from_config(config: &HostingConfig) -> Self {
        Self::new(&config.api_url, config.token.clone())
    }

    /// Create with explicit configuration.
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl Hosting for GitHubClient {
    async fn create_pull_request(&self, request: &PullRequest) -> Result<String, VcsError> {
        let token = self
            .token
            .as_deref()
            .ok_or(VcsError::MissingConfig("GITHUB_TOKEN"))?;
        let url = format!("{}/repos/{}/pulls", self.api_url, request.repository);
        tracing::debug!(%url, "Creating pull request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(&CreatePullBody {
                title: &request.title,
                body: &request.body,
                head: &request.head,
                base: &request.base,
            })
            .send()
            .await
            .map_err(|e| VcsError::PullRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = match status {
                StatusCode::UNAUTHORIZED => "Unauthorized: check GITHUB_TOKEN".to_string(),
                StatusCode::NOT_FOUND => format!("Repository not found: {}", request.repository),
                _ => format!("{}: {}", status, body),
            };
            return Err(VcsError::PullRequest(reason));
        }

        let created: CreatedPull = response
            .json()
            .await
            .map_err(|e| VcsError::PullRequest(e.to_string()))?;
        tracing::info!(url = %created.html_url, "Opened pull request");
        Ok(created.html_url)
    }
}
