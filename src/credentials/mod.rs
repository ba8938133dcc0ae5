pub mod prompt;

use std::cell::OnceCell;
use std::path::PathBuf;

use crate::config::{load_config, Config};
use crate::error::OpenError;
use crate::provider::Provider;

/// Environment variable overriding the stored GitHub token
pub const ENV_GITHUB_TOKEN: &str = "PRO_GITHUB_TOKEN";
/// Environment variable overriding the stored GitLab token
pub const ENV_GITLAB_TOKEN: &str = "PRO_GITLAB_TOKEN";

pub use prompt::run_auth;

/// Source of provider access tokens.
///
/// An empty string means no token is configured for that provider. Errors
/// are reserved for a token source that exists but cannot be read.
pub trait CredentialStore {
    fn token(&self, provider: Provider) -> Result<String, OpenError>;
}

pub fn env_var_for(provider: Provider) -> &'static str {
    match provider {
        Provider::GitHub => ENV_GITHUB_TOKEN,
        Provider::GitLab => ENV_GITLAB_TOKEN,
    }
}

/// Check for a token in the provider's environment variable.
/// Returns Some(token) if the env var is set and non-empty, None otherwise.
pub fn get_token_from_env(provider: Provider) -> Option<String> {
    match std::env::var(env_var_for(provider)) {
        Ok(val) => non_blank(&val),
        Err(_) => None,
    }
}

fn non_blank(val: &str) -> Option<String> {
    let trimmed = val.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn stored_token(config: &Config, provider: Provider) -> Option<&str> {
    match provider {
        Provider::GitHub => config.github_token.as_deref(),
        Provider::GitLab => config.gitlab_token.as_deref(),
    }
}

/// Tokens from the environment first, then from the config file.
///
/// The config file is read on the first token lookup, so runs that never
/// reach a provider never touch it.
#[derive(Debug)]
pub struct ConfigCredentials {
    path: PathBuf,
    use_env: bool,
    config: OnceCell<Result<Config, String>>,
}

impl ConfigCredentials {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            use_env: true,
            config: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn without_env(path: PathBuf) -> Self {
        Self {
            use_env: false,
            ..Self::new(path)
        }
    }

    fn config(&self) -> Result<&Config, OpenError> {
        self.config
            .get_or_init(|| {
                log::debug!("Loading config from {}", self.path.display());
                load_config(&self.path).map_err(|e| format!("{:#}", e))
            })
            .as_ref()
            .map_err(|message| OpenError::Config {
                path: self.path.clone(),
                message: message.clone(),
            })
    }
}

impl CredentialStore for ConfigCredentials {
    fn token(&self, provider: Provider) -> Result<String, OpenError> {
        if self.use_env {
            if let Some(token) = get_token_from_env(provider) {
                log::debug!("Using {} token from {}", provider, env_var_for(provider));
                return Ok(token);
            }
        }

        match stored_token(self.config()?, provider).and_then(non_blank) {
            Some(token) => {
                log::debug!("Using {} token from config file", provider);
                Ok(token)
            }
            None => Ok(String::new()),
        }
    }
}

/// Store `token` for `provider` in `config`.
pub fn set_token(config: &mut Config, provider: Provider, token: String) {
    match provider {
        Provider::GitHub => config.github_token = Some(token),
        Provider::GitLab => config.gitlab_token = Some(token),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, yaml: &str) -> PathBuf {
        let path = dir.path().join("config.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    #[test]
    fn test_tokens_from_config() {
        let dir = TempDir::new().unwrap();
        let store = ConfigCredentials::without_env(write_config(&dir, "github_token: ghp_123\n"));

        assert_eq!(store.token(Provider::GitHub).unwrap(), "ghp_123");
        assert_eq!(store.token(Provider::GitLab).unwrap(), "");
    }

    #[test]
    fn test_blank_token_is_not_configured() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "github_token: \"   \"\ngitlab_token: \"\"\n");
        let store = ConfigCredentials::without_env(path);

        assert_eq!(store.token(Provider::GitHub).unwrap(), "");
        assert_eq!(store.token(Provider::GitLab).unwrap(), "");
    }

    #[test]
    fn test_missing_config_file_means_no_tokens() {
        let dir = TempDir::new().unwrap();
        let store = ConfigCredentials::without_env(dir.path().join("config.yaml"));

        assert_eq!(store.token(Provider::GitHub).unwrap(), "");
    }

    #[test]
    fn test_malformed_config_reported_on_lookup() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "github_token: [unterminated\n");
        let store = ConfigCredentials::without_env(path.clone());

        let err = store.token(Provider::GitHub).unwrap_err();
        assert!(matches!(&err, OpenError::Config { path: p, .. } if *p == path));
        assert!(err.to_string().contains("invalid YAML"));
    }

    #[test]
    fn test_config_read_once() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "gitlab_token: glpat-1\n");
        let store = ConfigCredentials::without_env(path.clone());

        assert_eq!(store.token(Provider::GitLab).unwrap(), "glpat-1");
        fs::remove_file(&path).unwrap();
        assert_eq!(store.token(Provider::GitLab).unwrap(), "glpat-1");
    }

    #[test]
    fn test_set_token() {
        let mut config = Config::default();
        set_token(&mut config, Provider::GitLab, "glpat-1".to_string());
        assert_eq!(config.gitlab_token.as_deref(), Some("glpat-1"));
        assert_eq!(config.github_token, None);
    }

    #[test]
    fn test_env_var_names() {
        assert_eq!(env_var_for(Provider::GitHub), "PRO_GITHUB_TOKEN");
        assert_eq!(env_var_for(Provider::GitLab), "PRO_GITLAB_TOKEN");
    }
}
