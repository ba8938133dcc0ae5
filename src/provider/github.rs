use http::StatusCode;
use octocrab::params::State;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;

use super::{ProviderError, RequestRecord};

const API_BASE: &str = "https://api.github.com";

/// Create an authenticated GitHub client using a personal access token.
///
/// Retries are off: each lookup is a single request.
fn create_client(base_uri: &str, token: &str) -> Result<Octocrab, ProviderError> {
    let client_error =
        |e: octocrab::Error| ProviderError::Transport(format!("Failed to create GitHub client: {}", e));

    Octocrab::builder()
        .base_uri(base_uri)
        .map_err(client_error)?
        .personal_token(token.to_string())
        .add_retry_config(RetryConfig::None)
        .build()
        .map_err(client_error)
}

/// Split `owner/repo` into its parts.
fn split_project_path(project_path: &str) -> Result<(&str, &str), ProviderError> {
    match project_path.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(ProviderError::Transport(format!(
            "Invalid GitHub repository path: {}",
            project_path
        ))),
    }
}

/// Value of the `head` filter: GitHub expects `owner:branch`.
fn head_filter(owner: &str, branch: &str) -> String {
    format!("{}:{}", owner, branch)
}

/// Map an octocrab error onto the shared provider outcomes.
fn classify_error(err: octocrab::Error) -> ProviderError {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            if source.status_code == StatusCode::UNAUTHORIZED {
                ProviderError::Unauthorized(source.message)
            } else {
                ProviderError::Transport(format!("GitHub API error: {}", source.message))
            }
        }
        other => ProviderError::Transport(format!("GitHub API error: {}", other)),
    }
}

/// Find the open pull request whose head is `branch` in `owner/repo`.
///
/// When several match, the first one in GitHub's default ordering (newest first) wins.
pub async fn find_pull_request(
    project_path: &str,
    token: &str,
    branch: &str,
) -> Result<RequestRecord, ProviderError> {
    find_pull_request_at(API_BASE, project_path, token, branch).await
}

async fn find_pull_request_at(
    base_uri: &str,
    project_path: &str,
    token: &str,
    branch: &str,
) -> Result<RequestRecord, ProviderError> {
    let (owner, repo) = split_project_path(project_path)?;
    let client = create_client(base_uri, token)?;

    log::debug!(
        "GitHub: listing open pulls for {}/{} with head {}",
        owner,
        repo,
        head_filter(owner, branch)
    );

    let page = client
        .pulls(owner, repo)
        .list()
        .state(State::Open)
        .head(head_filter(owner, branch))
        .per_page(1u8)
        .send()
        .await
        .map_err(classify_error)?;

    let pull = page.items.into_iter().next().ok_or(ProviderError::NotFound)?;
    let web_url = pull
        .html_url
        .map(|url| url.to_string())
        .ok_or_else(|| {
            ProviderError::Transport(format!("Pull request #{} has no web URL", pull.number))
        })?;

    Ok(RequestRecord { web_url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn pull(number: u64, html_url: Option<&str>) -> serde_json::Value {
        let mut pull = json!({
            "url": format!("https://api.github.com/repos/acme/widgets/pulls/{}", number),
            "id": 1000 + number,
            "number": number,
            "head": { "ref": "feature/x", "sha": "aaaaaaa" },
            "base": { "ref": "main", "sha": "bbbbbbb" },
        });
        if let Some(html_url) = html_url {
            pull["html_url"] = json!(html_url);
        }
        pull
    }

    async fn server_with_pulls(status: usize, body: String) -> (ServerGuard, mockito::Mock) {
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/repos/acme/widgets/pulls")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("state".into(), "open".into()),
                Matcher::UrlEncoded("head".into(), "acme:feature/x".into()),
            ]))
            .match_header("authorization", "Bearer ghp_test")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;
        (server, mock)
    }

    async fn lookup(server: &ServerGuard) -> Result<RequestRecord, ProviderError> {
        find_pull_request_at(&server.url(), "acme/widgets", "ghp_test", "feature/x").await
    }

    #[test]
    fn test_split_project_path() {
        assert_eq!(split_project_path("acme/widgets"), Ok(("acme", "widgets")));
        assert!(split_project_path("widgets").is_err());
        assert!(split_project_path("acme/").is_err());
        assert!(split_project_path("acme/group/widgets").is_err());
    }

    #[test]
    fn test_head_filter() {
        assert_eq!(head_filter("acme", "feature/x"), "acme:feature/x");
    }

    #[tokio::test]
    async fn test_invalid_path_fails_before_network() {
        let result = find_pull_request("widgets", "token", "feature/x").await;
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }

    #[tokio::test]
    async fn test_empty_list_is_not_found() {
        let (server, mock) = server_with_pulls(200, "[]".to_string()).await;

        let result = lookup(&server).await;

        assert_eq!(result, Err(ProviderError::NotFound));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_first_of_several_pulls_wins() {
        let body = json!([
            pull(42, Some("https://github.com/acme/widgets/pull/42")),
            pull(7, Some("https://github.com/acme/widgets/pull/7")),
        ]);
        let (server, mock) = server_with_pulls(200, body.to_string()).await;

        let record = lookup(&server).await.unwrap();

        assert_eq!(record.web_url, "https://github.com/acme/widgets/pull/42");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_pull_without_web_url_is_transport_error() {
        let body = json!([pull(42, None)]);
        let (server, _mock) = server_with_pulls(200, body.to_string()).await;

        let result = lookup(&server).await;

        assert!(matches!(
            result,
            Err(ProviderError::Transport(msg)) if msg.contains("#42")
        ));
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let body = json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        });
        let (server, _mock) = server_with_pulls(401, body.to_string()).await;

        let result = lookup(&server).await;

        assert_eq!(
            result,
            Err(ProviderError::Unauthorized("Bad credentials".to_string()))
        );
    }

    #[tokio::test]
    async fn test_server_error_is_transport_and_not_retried() {
        let body = json!({ "message": "Server Error" });
        let (server, mock) = server_with_pulls(500, body.to_string()).await;

        let result = lookup(&server).await;

        assert!(matches!(
            result,
            Err(ProviderError::Transport(msg)) if msg.contains("Server Error")
        ));
        mock.assert_async().await;
    }
}
