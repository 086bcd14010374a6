//! Runtime configuration for drafting release notes.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use git2::Repository;
use tracing::{debug, warn};

use crate::document::Placeholders;
use crate::git::Git2RepoOpener;
use crate::github::{get_github_token, parse_github_remote};
use crate::noter::ReleaseNoter;
use crate::notes::{DEFAULT_GITHUB_ORG, DEFAULT_GITHUB_REPO};
use crate::produce::external::tool_timeout_from_env;
use crate::produce::{ExternalToolProducer, GathererProducer, NotesProducer};

/// Which producer builds the notes body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// Gather and render notes in process.
    #[default]
    Gatherer,
    /// Run the external `relnotes` tool.
    ExternalTool,
}

/// Everything needed to build a [`ReleaseNoter`].
#[derive(Debug, Clone)]
pub struct NoterConfig {
    pub repo_dir: PathBuf,
    pub release_tools_dir: PathBuf,
    pub strategy: Strategy,
    pub github_org: String,
    pub github_repo: String,
    pub github_token: Option<String>,
    pub fetch_prs: bool,
    pub tool_timeout: Duration,
    pub placeholders: Placeholders,
}

/// Values supplied on the command line; unset fields fall back to
/// discovery and defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub repo_dir: Option<PathBuf>,
    pub release_tools_dir: Option<PathBuf>,
    pub strategy: Strategy,
    pub github_org: Option<String>,
    pub github_repo: Option<String>,
    pub no_prs: bool,
}

impl NoterConfig {
    /// Build the configuration from overrides, the repository's `origin`
    /// remote, the GitHub token lookup, and the environment.
    pub fn load(overrides: ConfigOverrides) -> Self {
        let github_token = match get_github_token() {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("{}", e);
                None
            }
        };
        Self::with_token(overrides, github_token)
    }

    /// Like [`NoterConfig::load`] with an already known token.
    pub fn with_token(overrides: ConfigOverrides, github_token: Option<String>) -> Self {
        let repo_dir = overrides.repo_dir.unwrap_or_else(|| PathBuf::from("."));

        let (inferred_org, inferred_repo) = match origin_owner_repo(&repo_dir) {
            Some((org, repo)) => (Some(org), Some(repo)),
            None => (None, None),
        };

        let github_org = overrides
            .github_org
            .or(inferred_org)
            .unwrap_or_else(|| DEFAULT_GITHUB_ORG.to_string());
        let github_repo = overrides
            .github_repo
            .or(inferred_repo)
            .unwrap_or_else(|| DEFAULT_GITHUB_REPO.to_string());

        let fetch_prs = !overrides.no_prs && github_token.is_some();
        if !overrides.no_prs && github_token.is_none() {
            warn!("No GitHub token available; release notes will be built from commits only");
        }

        Self {
            repo_dir,
            release_tools_dir: overrides
                .release_tools_dir
                .unwrap_or_else(|| PathBuf::from(".")),
            strategy: overrides.strategy,
            github_org,
            github_repo,
            github_token,
            fetch_prs,
            tool_timeout: tool_timeout_from_env(),
            placeholders: Placeholders::default(),
        }
    }

    /// The producer selected by [`NoterConfig::strategy`].
    pub fn producer(&self) -> Box<dyn NotesProducer> {
        match self.strategy {
            Strategy::Gatherer => Box::new(GathererProducer {
                github_org: self.github_org.clone(),
                github_repo: self.github_repo.clone(),
                fetch_prs: self.fetch_prs,
            }),
            Strategy::ExternalTool => Box::new(
                ExternalToolProducer::new(&self.release_tools_dir).with_timeout(self.tool_timeout),
            ),
        }
    }

    /// Build a noter over the local repository at `repo_dir`.
    pub fn build(&self) -> ReleaseNoter {
        ReleaseNoter::new(&self.repo_dir, Box::new(Git2RepoOpener), self.producer())
            .with_github_token(self.github_token.clone())
            .with_placeholders(self.placeholders.clone())
    }
}

fn origin_owner_repo(repo_dir: &Path) -> Option<(String, String)> {
    let repo = Repository::open(repo_dir).ok()?;
    let remote = repo.find_remote("origin").ok()?;
    let url = remote.url()?;
    match parse_github_remote(url) {
        Ok(pair) => Some(pair),
        Err(e) => {
            debug!(url, error = %e, "origin is not a GitHub remote");
            None
        }
    }
}
