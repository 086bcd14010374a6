//! GitHub API operations using octocrab.

pub mod auth;
pub mod prs;

pub use auth::get_github_token;
pub use prs::{
    PullRequest, build_client, fetch_pull_request, fetch_pull_request_with_client,
    parse_github_remote,
};
