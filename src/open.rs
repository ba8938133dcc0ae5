//! Resolve the current branch to a pull/merge request URL and hand it to
//! the browser.

use std::path::Path;

use crate::browser::BrowserLauncher;
use crate::credentials::CredentialStore;
use crate::error::OpenError;
use crate::provider::{Provider, ProviderError, RequestFinder};
use crate::remote::RemoteDescriptor;
use crate::repo::{self, Head};

/// Branches a request never targets; these open the project home page instead.
pub const DEFAULT_BRANCHES: &[&str] = &["master", "main", "trunk", "develop"];

/// How a lookup ended. Every variant is a successful outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An open request exists for the branch.
    Request {
        branch: String,
        provider: Provider,
        url: String,
    },
    /// On a default branch: the project home page.
    HomePage { branch: String, url: String },
    /// No open request yet: link to create one.
    NoRequest {
        branch: String,
        provider: Provider,
        create_url: String,
    },
    /// HEAD is not on a branch.
    DetachedHead,
}

impl Resolution {
    /// URL to open in the browser, if this outcome opens one.
    pub fn browser_target(&self) -> Option<&str> {
        match self {
            Resolution::Request { url, .. } | Resolution::HomePage { url, .. } => Some(url),
            Resolution::NoRequest { .. } | Resolution::DetachedHead => None,
        }
    }
}

pub fn is_default_branch(branch: &str) -> bool {
    DEFAULT_BRANCHES.contains(&branch)
}

/// Local state needed for the lookup. Collected up front so no git handle
/// is held across the network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    pub remote: RemoteDescriptor,
    pub head: Head,
}

/// Read the repository enclosing `path`: its `origin` remote and HEAD.
pub fn inspect(path: &Path) -> Result<Checkout, OpenError> {
    let repository = repo::find_repo(path)?;
    log::debug!("Repository root: {}", repo::repo_root(&repository).display());

    let remote = repo::origin(&repository)?;
    log::debug!("origin: {}", remote);

    let head = repo::current_head(&repository)?;
    log::debug!("HEAD: {:?}", head);

    Ok(Checkout { remote, head })
}

/// Work out which URL belongs to the branch checked out at `path`.
pub async fn resolve(
    path: &Path,
    credentials: &impl CredentialStore,
    finder: &impl RequestFinder,
) -> Result<Resolution, OpenError> {
    let checkout = inspect(path)?;
    resolve_checkout(checkout, credentials, finder).await
}

/// Work out which URL belongs to an already inspected checkout.
///
/// Credentials are only consulted right before a provider lookup.
pub async fn resolve_checkout(
    checkout: Checkout,
    credentials: &impl CredentialStore,
    finder: &impl RequestFinder,
) -> Result<Resolution, OpenError> {
    let Checkout { remote, head } = checkout;

    let branch = match head {
        Head::Branch(name) => name,
        Head::Detached => return Ok(Resolution::DetachedHead),
    };

    if is_default_branch(&branch) {
        return Ok(Resolution::HomePage {
            url: remote.home_url(),
            branch,
        });
    }

    let provider = Provider::from_host(&remote.host).ok_or_else(|| {
        OpenError::UnknownRemoteType {
            host: remote.host.clone(),
        }
    })?;
    log::debug!("Provider: {}", provider);

    let token = credentials.token(provider)?;
    if token.is_empty() {
        return Err(OpenError::MissingCredential(provider));
    }

    match finder
        .find_open_request(provider, &remote.project_path, &token, &branch)
        .await
    {
        Ok(record) => Ok(Resolution::Request {
            branch,
            provider,
            url: record.web_url,
        }),
        Err(ProviderError::NotFound) => Ok(Resolution::NoRequest {
            create_url: provider.new_request_url(&remote.project_path, &branch),
            branch,
            provider,
        }),
        Err(source) => Err(OpenError::Provider { provider, source }),
    }
}

/// Open the resolved URL in the browser unless `print` is set.
pub fn deliver(
    resolution: &Resolution,
    print: bool,
    launcher: &impl BrowserLauncher,
) -> Result<(), OpenError> {
    if print {
        return Ok(());
    }

    match resolution.browser_target() {
        Some(url) => launcher.open(url).map_err(|source| OpenError::BrowserLaunch {
            url: url.to_string(),
            source,
        }),
        None => Ok(()),
    }
}
