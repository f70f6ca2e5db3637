//! Version-control gateway.
//!
//! Two narrow capabilities sit behind traits so the command layer can run
//! against fakes:
//! - [`VersionControl`]: the local working copy (branch, commit, push).
//! - [`Hosting`]: the remote service that opens pull requests.
//!
//! Failures are reported as [`VcsError`] values; nothing here panics or retries.

mod git;
mod github;

pub use git::GitRepository;
pub use github::GitHubClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::HostingConfig;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Missing configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("Refusing to open a pull request from '{0}' into itself")]
    SameBranch(String),

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("Pull request failed: {0}")]
    PullRequest(String),

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),
}

/// Operations on the local working copy.
pub trait VersionControl {
    /// Name of the checked-out branch.
    fn active_branch(&self) -> Result<String, VcsError>;

    /// Create `name` from HEAD and switch to it, or switch to it if it exists.
    fn create_or_switch_branch(&self, name: &str) -> Result<(), VcsError>;

    /// Stage every change and commit it.
    ///
    /// Returns `None` without committing when nothing differs from HEAD.
    fn stage_and_commit(&self, message: &str) -> Result<Option<String>, VcsError>;

    /// Push the active branch to `origin`, returning the pushed refspec.
    ///
    /// Every failure cause maps to [`VcsError::Push`].
    fn push_current(&self) -> Result<String, VcsError>;
}

/// A pull request to open on the hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub repository: String,
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
}

#[async_trait]
pub trait Hosting: Send + Sync {
    /// Create the pull request and return its web URL.
    async fn create_pull_request(&self, request: &PullRequest) -> Result<String, VcsError>;
}

/// Open a pull request from the active branch into the configured default branch.
///
/// Refuses when a token or repository is not configured, or when the active
/// branch is the default branch.
pub async fn open_pull_request(
    config: &HostingConfig,
    repo: &dyn VersionControl,
    host: &dyn Hosting,
    title: &str,
    body: &str,
) -> Result<String, VcsError> {
    if config.token.is_none() {
        return Err(VcsError::MissingConfig("GITHUB_TOKEN"));
    }
    let repository = config
        .repository
        .clone()
        .ok_or(VcsError::MissingConfig("GITHUB_REPO"))?;

    let head = repo.active_branch()?;
    if head == config.default_branch {
        return Err(VcsError::SameBranch(head));
    }

    let request = PullRequest {
        repository,
        title: title.to_string(),
        body: body.to_string(),
        head,
        base: config.default_branch.clone(),
    };
    tracing::info!(
        repository = %request.repository,
        head = %request.head,
        base = %request.base,
        "Opening pull request"
    );
    host.create_pull_request(&request).await
}
