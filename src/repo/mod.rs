//! Reading the local git state: which repository we are in, where its
//! `origin` points and which branch is checked out.

use git2::{ErrorCode, Repository};
use std::path::{Path, PathBuf};

use crate::error::OpenError;
use crate::remote::{RemoteDescriptor, RemoteUrlError};

const ORIGIN: &str = "origin";

/// What HEAD points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// A local branch (possibly unborn).
    Branch(String),
    /// A commit or anything else that is not a local branch.
    Detached,
}

/// Find the repository enclosing `start`.
///
/// Checks `start` itself, then each parent directory up to the filesystem root.
pub fn find_repo(start: &Path) -> Result<Repository, OpenError> {
    let start = std::path::absolute(start).map_err(OpenError::WorkingDirectory)?;

    for dir in start.ancestors() {
        match Repository::open(dir) {
            Ok(repo) => {
                log::debug!("Found repository at {}", dir.display());
                return Ok(repo);
            }
            Err(e) if e.code() == ErrorCode::NotFound => continue,
            Err(e) => {
                return Err(OpenError::Locator {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
        }
    }

    Err(OpenError::RepositoryNotFound { start })
}

/// Directory the repository is rooted at (the git dir for bare repositories).
pub fn repo_root(repo: &Repository) -> PathBuf {
    repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf()
}

/// Raw URL of the `origin` remote.
pub fn origin_url(repo: &Repository) -> Result<String, OpenError> {
    let remote = match repo.find_remote(ORIGIN) {
        Ok(remote) => remote,
        Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => {
            return Err(OpenError::MissingOrigin)
        }
        Err(e) => return Err(OpenError::RepositoryState(e)),
    };

    match remote.url() {
        Some(url) => Ok(url.to_string()),
        None if remote.url_bytes().is_empty() => Err(RemoteUrlError::Empty.into()),
        None => Err(RemoteUrlError::NotUtf8.into()),
    }
}

/// Normalized `origin` remote.
pub fn origin(repo: &Repository) -> Result<RemoteDescriptor, OpenError> {
    let url = origin_url(repo)?;
    log::debug!("origin URL: {}", url);
    Ok(RemoteDescriptor::parse(&url)?)
}

/// Resolve what HEAD currently points at.
pub fn current_head(repo: &Repository) -> Result<Head, OpenError> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch => return unborn_head(repo),
        Err(e) => return Err(OpenError::RepositoryState(e)),
    };

    if !head.is_branch() {
        return Ok(Head::Detached);
    }

    match head.shorthand() {
        Some(name) => Ok(Head::Branch(name.to_string())),
        None => Err(OpenError::RepositoryState(git2::Error::from_str(
            "branch name is not valid UTF-8",
        ))),
    }
}

/// A fresh repository has a symbolic HEAD to a branch with no commits yet.
fn unborn_head(repo: &Repository) -> Result<Head, OpenError> {
    let head = repo
        .find_reference("HEAD")
        .map_err(OpenError::RepositoryState)?;

    Ok(head
        .symbolic_target()
        .and_then(|target| target.strip_prefix("refs/heads/"))
        .map(|name| Head::Branch(name.to_string()))
        .unwrap_or(Head::Detached))
}
