pub mod github;
pub mod gitlab;

use clap::ValueEnum;
use std::fmt;
use thiserror::Error;

/// Hosting providers `pro` knows how to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Provider {
    #[value(name = "github")]
    GitHub,
    #[value(name = "gitlab")]
    GitLab,
}

/// The open pull/merge request found for a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    pub web_url: String,
}

/// Outcome kinds shared by both providers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no open request for this branch")]
    NotFound,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    TokenExpired(String),

    #[error("{0}")]
    Transport(String),
}

impl Provider {
    /// Select a provider by exact host match.
    pub fn from_host(host: &str) -> Option<Self> {
        match host {
            "github.com" => Some(Provider::GitHub),
            "gitlab.com" => Some(Provider::GitLab),
            _ => None,
        }
    }

    /// Name used on the command line and in the config file.
    pub fn cli_name(self) -> &'static str {
        match self {
            Provider::GitHub => "github",
            Provider::GitLab => "gitlab",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::GitHub => "GitHub",
            Provider::GitLab => "GitLab",
        }
    }

    pub fn request_noun(self) -> &'static str {
        match self {
            Provider::GitHub => "pull request",
            Provider::GitLab => "merge request",
        }
    }

    /// Page for opening a new request from `branch`. The branch is inserted verbatim.
    pub fn new_request_url(self, project_path: &str, branch: &str) -> String {
        match self {
            Provider::GitHub => format!("https://github.com/{}/pull/new/{}", project_path, branch),
            Provider::GitLab => format!(
                "https://gitlab.com/{}/merge_requests/new?merge_request%5Bsource_branch%5D={}",
                project_path, branch
            ),
        }
    }

    /// Page where the user creates an access token for `pro`.
    pub fn token_settings_url(self) -> &'static str {
        match self {
            Provider::GitHub => "https://github.com/settings/tokens/new?scopes=repo&description=pro",
            Provider::GitLab => {
                "https://gitlab.com/-/user_settings/personal_access_tokens?name=pro&scopes=read_api"
            }
        }
    }

    /// Look up the open request for `branch` in this provider's API.
    pub async fn find_open_request(
        self,
        project_path: &str,
        token: &str,
        branch: &str,
    ) -> Result<RequestRecord, ProviderError> {
        match self {
            Provider::GitHub => github::find_pull_request(project_path, token, branch).await,
            Provider::GitLab => gitlab::find_merge_request(project_path, token, branch).await,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Seam between the orchestrator and the provider APIs.
#[allow(async_fn_in_trait)]
pub trait RequestFinder {
    async fn find_open_request(
        &self,
        provider: Provider,
        project_path: &str,
        token: &str,
        branch: &str,
    ) -> Result<RequestRecord, ProviderError>;
}

/// Finder that talks to the real provider APIs.
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiFinder;

impl RequestFinder for ApiFinder {
    async fn find_open_request(
        &self,
        provider: Provider,
        project_path: &str,
        token: &str,
        branch: &str,
    ) -> Result<RequestRecord, ProviderError> {
        provider.find_open_request(project_path, token, branch).await
    }
}
