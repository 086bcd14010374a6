//! Drafts the release notes document for the checked-out branch.

use std::path::PathBuf;

use tracing::debug;

use crate::document::{Placeholders, assemble_with};
use crate::error::{ReleaseNotesError, RepoQuery, ResolveError};
use crate::git::{RepoOpener, RevisionRange, resolve_range};
use crate::produce::{NotesProducer, ProduceContext};

/// A drafted document together with the range it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub range: RevisionRange,
    pub document: String,
}

/// Opens the repository, resolves the range, produces notes, and assembles
/// the final document.
pub struct ReleaseNoter {
    pub repo_dir: PathBuf,
    pub github_token: Option<String>,
    pub placeholders: Placeholders,
    opener: Box<dyn RepoOpener>,
    producer: Box<dyn NotesProducer>,
}

impl ReleaseNoter {
    pub fn new(
        repo_dir: impl Into<PathBuf>,
        opener: Box<dyn RepoOpener>,
        producer: Box<dyn NotesProducer>,
    ) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            github_token: None,
            placeholders: Placeholders::default(),
            opener,
            producer,
        }
    }

    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token;
        self
    }

    pub fn with_placeholders(mut self, placeholders: Placeholders) -> Self {
        self.placeholders = placeholders;
        self
    }

    /// Resolve the revision range of the repository at `repo_dir`.
    pub fn resolve(&self) -> Result<RevisionRange, ResolveError> {
        let repo = self
            .opener
            .open(&self.repo_dir)
            .map_err(ResolveError::repository(RepoQuery::Open))?;
        resolve_range(repo.as_ref())
    }

    /// Draft the document and report the range it was built from.
    pub async fn draft(&self) -> Result<Draft, ReleaseNotesError> {
        let range = self.resolve()?;

        let ctx = ProduceContext {
            work_dir: self.repo_dir.clone(),
            github_token: self.github_token.clone(),
        };
        let body = self.producer.produce(&range, &ctx).await?;
        debug!(bytes = body.len(), "Release notes body produced");

        Ok(Draft {
            document: assemble_with(&body, &self.placeholders),
            range,
        })
    }

    /// Draft the document.
    pub async fn get_markdown(&self) -> Result<String, ReleaseNotesError> {
        Ok(self.draft().await?.document)
    }
}
