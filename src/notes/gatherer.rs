//! Walks the revision range and turns commits into release notes.

use std::collections::HashSet;

use git2::Repository;
use octocrab::Octocrab;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{GatherError, GitError, GitHubError};
use crate::git::ParsedCommit;
use crate::git::commits::{fetch_commits, resolve_reference};
use crate::github::{build_client, fetch_pull_request_with_client};

use super::note::{ReleaseNote, note_for_commit};
use super::options::Options;

/// Notes collected for a range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GatheredNotes {
    /// Notes in history order, newest first.
    pub notes: Vec<ReleaseNote>,
    /// Every commit visited, newest first.
    pub history: Vec<String>,
}

/// Collects release notes for the range described by [`Options`].
pub struct Gatherer {
    options: Options,
    client: Option<Octocrab>,
}

impl Gatherer {
    /// Create a gatherer for validated options.
    pub fn new(options: Options) -> Self {
        Self {
            options,
            client: None,
        }
    }

    /// Use a pre-configured GitHub client (e.g. pointed at a mock server).
    pub fn with_client(mut self, client: Octocrab) -> Self {
        self.client = Some(client);
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// List the release notes between `start_rev` and `end_sha`.
    ///
    /// With PR fetching enabled only commits that reference a PR yield
    /// notes, one per PR. Otherwise every non-merge commit yields a note.
    pub async fn list_release_notes(&self) -> Result<GatheredNotes, GatherError> {
        let commits = self.walk_commits()?;
        let history: Vec<String> = commits.iter().map(|c| c.hash.clone()).collect();

        info!(
            start = %self.options.start_rev,
            end = %self.options.end_sha,
            commits = commits.len(),
            "Gathering release notes"
        );

        let notes = if self.options.fetch_prs {
            self.notes_from_prs(&commits).await?
        } else {
            commits
                .iter()
                .filter_map(|commit| note_for_commit(commit, None))
                .collect()
        };

        Ok(GatheredNotes { notes, history })
    }

    fn walk_commits(&self) -> Result<Vec<ParsedCommit>, GitError> {
        let repo = Repository::open(&self.options.repo_path).map_err(GitError::OpenRepository)?;
        let from = resolve_reference(&repo, &self.options.start_rev)?;
        let to = resolve_reference(&repo, &self.options.end_sha)?;
        fetch_commits(&repo, from, to)
    }

    async fn notes_from_prs(&self, commits: &[ParsedCommit]) -> Result<Vec<ReleaseNote>, GatherError> {
        let client = match &self.client {
            Some(client) => client.clone(),
            None => build_client(self.options.github_token.as_deref().unwrap_or_default())?,
        };

        let org = &self.options.github_org;
        let repo = &self.options.github_repo;
        let mut seen = HashSet::new();
        let mut notes = Vec::new();

        for commit in commits {
            let Some(number) = commit.pr_number else {
                debug!(commit = %commit.short_hash(), "Commit has no PR reference, skipping");
                continue;
            };
            if !seen.insert(number) {
                continue;
            }

            let note = match fetch_pull_request_with_client(&client, org, repo, number).await {
                Ok(pr) => note_for_commit(commit, Some(&pr)),
                Err(GitHubError::NotFound { .. }) => {
                    warn!(pr = number, "PR not found on GitHub, using commit subject");
                    note_for_commit(commit, None)
                }
                Err(e) => return Err(e.into()),
            };

            match note {
                Some(note) => notes.push(note),
                None => debug!(pr = number, "PR has no release note"),
            }
        }

        Ok(notes)
    }
}
