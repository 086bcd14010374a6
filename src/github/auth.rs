//! GitHub token discovery.
//!
//! Lookup order:
//! 1. `gh auth token` (only when `gh auth status` succeeds)
//! 2. `GITHUB_TOKEN`
//! 3. `GH_TOKEN`

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

/// Environment variables checked for a token, in order.
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Get a GitHub token from the gh CLI or the environment.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = get_token_from_gh_cli() {
        debug!("Using GitHub token from gh CLI");
        return Ok(token);
    }

    get_token_from_env().ok_or(GitHubError::AuthenticationFailed)
}

/// First non-empty token found in [`TOKEN_ENV_VARS`].
pub fn get_token_from_env() -> Option<String> {
    TOKEN_ENV_VARS.iter().find_map(|var| {
        env::var(var)
            .ok()
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .inspect(|_| debug!(var, "Using GitHub token from environment"))
    })
}

fn get_token_from_gh_cli() -> Option<String> {
    which::which("gh").ok()?;

    let status = Command::new("gh").args(["auth", "status"]).output().ok()?;
    if !status.status.success() {
        return None;
    }

    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
