//! Options for the in-process note gatherer.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{RenderError, RepoQuery, ResolveError};
use crate::git::{Git2Repo, resolve_range};

/// Default GitHub organization when none is configured or inferred.
pub const DEFAULT_GITHUB_ORG: &str = "kubernetes";

/// Default GitHub repository when none is configured or inferred.
pub const DEFAULT_GITHUB_REPO: &str = "kubernetes";

/// How the gatherer finds its revision range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum DiscoverMode {
    /// The caller sets `start_rev` and `end_sha`; nothing is inferred.
    #[default]
    None,
    /// From the newest release tag on the checked-out branch to its head.
    PatchToLatest,
}

/// Gatherer configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Options {
    pub discover_mode: DiscoverMode,
    pub github_org: String,
    pub github_repo: String,
    pub repo_path: PathBuf,
    #[serde(skip)]
    pub github_token: Option<String>,
    pub start_rev: String,
    pub end_sha: String,
    pub end_rev: String,
    pub fetch_prs: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            discover_mode: DiscoverMode::None,
            github_org: DEFAULT_GITHUB_ORG.to_string(),
            github_repo: DEFAULT_GITHUB_REPO.to_string(),
            repo_path: PathBuf::from("."),
            github_token: None,
            start_rev: String::new(),
            end_sha: String::new(),
            end_rev: String::new(),
            fetch_prs: false,
        }
    }
}

impl Options {
    /// Check the options and fill in derived values.
    ///
    /// With [`DiscoverMode::PatchToLatest`] the range is resolved from the
    /// repository at `repo_path`. `end_rev` defaults to `end_sha`.
    pub fn validate_and_finish(&mut self) -> Result<(), RenderError> {
        if self.github_org.trim().is_empty() {
            return Err(RenderError::Validating("GitHub organization is empty".into()));
        }
        if self.github_repo.trim().is_empty() {
            return Err(RenderError::Validating("GitHub repository is empty".into()));
        }
        if !self.repo_path.exists() {
            return Err(RenderError::Validating(format!(
                "repository path {} does not exist",
                self.repo_path.display()
            )));
        }
        if self.fetch_prs && self.github_token.as_deref().is_none_or(str::is_empty) {
            return Err(RenderError::Validating(
                "a GitHub token is required to fetch pull requests".into(),
            ));
        }

        if self.discover_mode == DiscoverMode::PatchToLatest {
            let repo = Git2Repo::open(&self.repo_path)
                .map_err(ResolveError::repository(RepoQuery::Open))
                .map_err(RenderError::Discovering)?;
            let range = resolve_range(&repo).map_err(RenderError::Discovering)?;
            self.start_rev = range.start;
            self.end_sha = range.end;
        }

        if self.start_rev.is_empty() {
            return Err(RenderError::Validating("start revision is not set".into()));
        }
        if self.end_sha.is_empty() {
            return Err(RenderError::Validating("end SHA is not set".into()));
        }
        if self.end_rev.is_empty() {
            self.end_rev = self.end_sha.clone();
        }

        Ok(())
    }
}
