//! PR fetching via octocrab.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};

use crate::error::GitHubError;

/// Represents a GitHub PR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub author: Option<String>,
    pub html_url: Option<String>,
    pub merged_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
}

/// Maximum PR body length kept (10KB).
const MAX_BODY_LENGTH: usize = 10 * 1024;

/// Build an authenticated octocrab client.
pub fn build_client(token: &str) -> Result<Octocrab, GitHubError> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| GitHubError::Client(Box::new(e)))
}

/// Fetch a single PR from a GitHub repository using a token.
pub async fn fetch_pull_request(
    token: &str,
    owner: &str,
    repo: &str,
    number: u64,
) -> Result<PullRequest, GitHubError> {
    let octocrab = build_client(token)?;
    fetch_pull_request_with_client(&octocrab, owner, repo, number).await
}

/// Fetch a single PR using a pre-configured octocrab client.
///
/// This allows dependency injection for testing with mock servers.
pub async fn fetch_pull_request_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    number: u64,
) -> Result<PullRequest, GitHubError> {
    let pr = octocrab
        .pulls(owner, repo)
        .get(number)
        .await
        .map_err(|e| classify_error(e, owner, repo, number))?;

    let body = pr.body.map(truncate_body);

    let labels = pr
        .labels
        .unwrap_or_default()
        .into_iter()
        .map(|l| l.name)
        .collect();

    Ok(PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        body,
        author: pr.user.map(|u| u.login),
        html_url: pr.html_url.map(|u| u.to_string()),
        merged_at: pr.merged_at,
        labels,
    })
}

fn truncate_body(body: String) -> String {
    if body.len() <= MAX_BODY_LENGTH {
        return body;
    }
    let mut end = MAX_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &body[..end])
}

fn classify_error(e: octocrab::Error, owner: &str, repo: &str, number: u64) -> GitHubError {
    // Check error content using both Display and Debug output
    // to handle different octocrab error formats
    let err_display = e.to_string();
    let err_debug = format!("{:?}", e);

    if err_display.to_lowercase().contains("rate limit")
        || err_debug.to_lowercase().contains("rate limit")
    {
        return GitHubError::RateLimited {
            reset_time: "unknown".to_string(),
        };
    }
    if err_display.contains("Not Found") || err_debug.contains("Not Found") {
        return GitHubError::NotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
            number,
        };
    }
    GitHubError::FetchPR {
        number,
        source: Box::new(e),
    }
}

/// Extract owner and repo from a git remote URL.
pub fn parse_github_remote(url: &str) -> Result<(String, String), GitHubError> {
    // Handle SSH format: git@github.com:owner/repo.git
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path);
    }

    // Handle HTTPS format: https://github.com/owner/repo.git
    if url.contains("github.com/") {
        let path = url
            .split("github.com/")
            .nth(1)
            .ok_or(GitHubError::InvalidRepositoryUrl)?;
        return parse_owner_repo_path(path);
    }

    Err(GitHubError::InvalidRepositoryUrl)
}

fn parse_owner_repo_path(path: &str) -> Result<(String, String), GitHubError> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let parts: Vec<&str> = path.split('/').collect();

    if parts.len() >= 2 && !parts[0].is_empty() && !parts[1].is_empty() {
        Ok((parts[0].to_string(), parts[1].to_string()))
    } else {
        Err(GitHubError::InvalidRepositoryUrl)
    }
}
