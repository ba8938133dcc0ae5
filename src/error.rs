use std::path::PathBuf;
use thiserror::Error;

use crate::provider::{Provider, ProviderError};
use crate::remote::RemoteUrlError;

// Exit codes
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_AUTH: i32 = 1;
pub const EXIT_NETWORK: i32 = 2;
pub const EXIT_CONFIG: i32 = 4;
pub const EXIT_BROWSER: i32 = 5;

/// Everything that can stop `pro open` from producing a URL.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("Unable to determine the working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    #[error("Unable to find git repository in {} or any of its parent directories.", .start.display())]
    RepositoryNotFound { start: PathBuf },

    #[error("Unable to open git repository at {}: {}", .path.display(), .source.message())]
    Locator {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("No remote named \"origin\" found.")]
    MissingOrigin,

    #[error("Unable to parse origin URL: {0}")]
    UrlParse(#[from] RemoteUrlError),

    #[error("Unable to get repository head: {}", .0.message())]
    RepositoryState(#[source] git2::Error),

    #[error("Unknown remote type: {host}")]
    UnknownRemoteType { host: String },

    #[error("Unable to load config from {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },

    #[error("{} token is not set.", .0.display_name())]
    MissingCredential(Provider),

    #[error("Unable to get {}s: {source}", .provider.request_noun())]
    Provider {
        provider: Provider,
        #[source]
        source: ProviderError,
    },

    #[error("Unable to open browser for {url}: {source}")]
    BrowserLaunch {
        url: String,
        #[source]
        source: std::io::Error,
    },
}

impl OpenError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            OpenError::MissingCredential(_) => EXIT_AUTH,
            OpenError::Provider { source, .. } => match source {
                ProviderError::Unauthorized(_) | ProviderError::TokenExpired(_) => EXIT_AUTH,
                _ => EXIT_NETWORK,
            },
            OpenError::BrowserLaunch { .. } => EXIT_BROWSER,
            _ => EXIT_CONFIG,
        }
    }

    /// Follow-up guidance shown under the error message, if any.
    pub fn hint(&self) -> Option<String> {
        match self {
            OpenError::WorkingDirectory(_)
            | OpenError::RepositoryNotFound { .. }
            | OpenError::Locator { .. } => {
                Some("Please make sure you are in the project directory.".to_string())
            }
            OpenError::MissingOrigin => {
                Some("Please make sure you have a remote named \"origin\".".to_string())
            }
            OpenError::UnknownRemoteType { .. } => {
                Some("Only github.com and gitlab.com remotes are supported.".to_string())
            }
            OpenError::Config { .. } => Some(
                "Fix or remove the config file and try again."
                    .to_string(),
            ),
            OpenError::MissingCredential(provider) => Some(format!(
                "Run `pro auth {}` to set it.",
                provider.cli_name()
            )),
            OpenError::Provider { provider, source } => match source {
                ProviderError::Unauthorized(_) | ProviderError::TokenExpired(_) => Some(format!(
                    "Token may be expired or deleted. Run `pro auth {}` to connect {} again.",
                    provider.cli_name(),
                    provider.display_name()
                )),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            OpenError::MissingCredential(Provider::GitHub).exit_code(),
            EXIT_AUTH
        );
        assert_eq!(
            OpenError::UnknownRemoteType {
                host: "bitbucket.org".to_string()
            }
            .exit_code(),
            EXIT_CONFIG
        );
        assert_eq!(
            OpenError::Provider {
                provider: Provider::GitLab,
                source: ProviderError::TokenExpired("Token is expired".to_string()),
            }
            .exit_code(),
            EXIT_AUTH
        );
        assert_eq!(
            OpenError::Provider {
                provider: Provider::GitHub,
                source: ProviderError::Transport("connection reset".to_string()),
            }
            .exit_code(),
            EXIT_NETWORK
        );
        assert_eq!(
            OpenError::Config {
                path: PathBuf::from("/tmp/config.yaml"),
                message: "invalid YAML".to_string(),
            }
            .exit_code(),
            EXIT_CONFIG
        );
        assert_ne!(OpenError::MissingOrigin.exit_code(), EXIT_SUCCESS);
    }

    #[test]
    fn test_provider_error_keeps_message() {
        let err = OpenError::Provider {
            provider: Provider::GitLab,
            source: ProviderError::Unauthorized("401 Unauthorized".to_string()),
        };
        assert!(err.to_string().contains("401 Unauthorized"));
        assert!(err.to_string().contains("merge request"));
        assert!(err.hint().unwrap().contains("pro auth gitlab"));
    }

    #[test]
    fn test_missing_credential_hint() {
        let err = OpenError::MissingCredential(Provider::GitHub);
        assert_eq!(err.to_string(), "GitHub token is not set.");
        assert_eq!(err.hint().unwrap(), "Run `pro auth github` to set it.");
    }
}
