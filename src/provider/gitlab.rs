use http::StatusCode;
use serde::Deserialize;
use url::Url;

use super::{ProviderError, RequestRecord};

const API_BASE: &str = "https://gitlab.com/api/v4/";

#[derive(Debug, Deserialize)]
struct MergeRequest {
    web_url: String,
}

/// GitLab error payloads come in two shapes: `{"message": ...}` for most API
/// errors and `{"error": ..., "error_description": ...}` for OAuth failures.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<serde_json::Value>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Build the merge request listing URL for a project.
///
/// The project path is sent as a single URL-encoded segment, so nested
/// groups (`group/subgroup/project`) work as well.
fn merge_requests_url(base: &str, project_path: &str, branch: &str) -> Result<Url, ProviderError> {
    let mut url = Url::parse(base)
        .map_err(|e| ProviderError::Transport(format!("Invalid GitLab API URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| ProviderError::Transport("Invalid GitLab API URL".to_string()))?
        .pop_if_empty()
        .extend(["projects", project_path, "merge_requests"]);

    url.query_pairs_mut()
        .append_pair("state", "opened")
        .append_pair("source_branch", branch)
        .append_pair("per_page", "1");

    Ok(url)
}

/// Map a non-success response onto the shared provider outcomes.
fn classify_error(status: StatusCode, body: &str) -> ProviderError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

    let message = parsed
        .error_description
        .clone()
        .or_else(|| parsed.message.as_ref().map(|m| match m {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
        .or_else(|| parsed.error.clone())
        .unwrap_or_else(|| status.to_string());

    if status == StatusCode::UNAUTHORIZED {
        let expired = parsed
            .error_description
            .as_deref()
            .is_some_and(|d| d.to_lowercase().contains("expired"))
            || message.to_lowercase().contains("expired");
        if expired {
            ProviderError::TokenExpired(message)
        } else {
            ProviderError::Unauthorized(message)
        }
    } else {
        ProviderError::Transport(format!("GitLab API error ({}): {}", status, message))
    }
}

/// Find the open merge request whose source branch is `branch`.
///
/// When several match, the first one in GitLab's default ordering (newest first) wins.
pub async fn find_merge_request(
    project_path: &str,
    token: &str,
    branch: &str,
) -> Result<RequestRecord, ProviderError> {
    find_merge_request_at(API_BASE, project_path, token, branch).await
}

async fn find_merge_request_at(
    base: &str,
    project_path: &str,
    token: &str,
    branch: &str,
) -> Result<RequestRecord, ProviderError> {
    let url = merge_requests_url(base, project_path, branch)?;
    log::debug!("GitLab: GET {}", url);

    let response = reqwest::Client::new()
        .get(url)
        .bearer_auth(token)
        .header("User-Agent", "pro")
        .send()
        .await
        .map_err(|e| ProviderError::Transport(format!("Failed to reach GitLab: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_error(status, &body));
    }

    let merge_requests: Vec<MergeRequest> = response
        .json()
        .await
        .map_err(|e| ProviderError::Transport(format!("Failed to parse GitLab response: {}", e)))?;

    merge_requests
        .into_iter()
        .next()
        .map(|mr| RequestRecord { web_url: mr.web_url })
        .ok_or(ProviderError::NotFound)
}
