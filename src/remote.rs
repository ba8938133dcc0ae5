//! Git remote URL normalization.
//!
//! Turns the URL configured for a remote into a [`RemoteDescriptor`]
//! (host + project path), whatever syntax the remote was added with.

use std::fmt;
use thiserror::Error;
use url::Url;

/// Schemes a hosted remote can be reached through.
const REMOTE_SCHEMES: &[&str] = &["https", "http", "ssh", "git", "git+ssh", "ssh+git"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteUrlError {
    #[error("remote URL is empty")]
    Empty,

    #[error("remote URL is not valid UTF-8")]
    NotUtf8,

    #[error("unsupported remote URL: {0}")]
    Unsupported(String),

    #[error("remote URL has no project path: {0}")]
    MissingPath(String),
}

/// Host and project path of a remote, independent of the URL syntax.
///
/// `project_path` never starts with `/` and never ends with `.git`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    pub host: String,
    pub project_path: String,
}

impl RemoteDescriptor {
    /// Parse a remote URL.
    ///
    /// Supported formats:
    /// - `https://<host>/<path>.git` (also `http`, `git`, `ssh`, `git+ssh`)
    /// - `ssh://git@<host>:<port>/<path>.git`
    /// - `git@<host>:<path>.git`
    /// - `<host>:<path>` (SCP-like without user)
    pub fn parse(raw: &str) -> Result<Self, RemoteUrlError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(RemoteUrlError::Empty);
        }

        let (host, path) = if raw.contains("://") {
            parse_scheme_url(raw)?
        } else {
            parse_scp_like(raw)?
        };

        let project_path = normalize_path(path);
        if project_path.is_empty() {
            return Err(RemoteUrlError::MissingPath(raw.to_string()));
        }

        Ok(Self {
            host,
            project_path,
        })
    }

    /// Project home page, e.g. `https://github.com/owner/repo`.
    pub fn home_url(&self) -> String {
        format!("https://{}/{}", self.host, self.project_path)
    }
}

impl fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.host, self.project_path)
    }
}

fn parse_scheme_url(raw: &str) -> Result<(String, String), RemoteUrlError> {
    let url = Url::parse(raw).map_err(|_| RemoteUrlError::Unsupported(raw.to_string()))?;

    if !REMOTE_SCHEMES.contains(&url.scheme()) {
        return Err(RemoteUrlError::Unsupported(raw.to_string()));
    }

    // host_str() drops userinfo and port
    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => return Err(RemoteUrlError::Unsupported(raw.to_string())),
    };

    Ok((host, url.path().to_string()))
}

fn parse_scp_like(raw: &str) -> Result<(String, String), RemoteUrlError> {
    let (authority, path) = raw
        .split_once(':')
        .ok_or_else(|| RemoteUrlError::Unsupported(raw.to_string()))?;

    // `user@host`; the user part is irrelevant
    let host = authority.rsplit('@').next().unwrap_or(authority);

    // A slash before the colon means a local path like `./dir:name`
    if host.is_empty() || host.contains('/') || path.starts_with("//") {
        return Err(RemoteUrlError::Unsupported(raw.to_string()));
    }

    Ok((host.to_string(), path.to_string()))
}

fn normalize_path(path: String) -> String {
    let path = path.strip_prefix('/').unwrap_or(&path);
    let path = path.trim_end_matches('/');
    path.strip_suffix(".git").unwrap_or(path).to_string()
}
