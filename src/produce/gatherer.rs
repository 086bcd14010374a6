//! In-process strategy: gather notes with git2/octocrab and render markdown.

use async_trait::async_trait;
use tracing::info;

use crate::error::{ProduceError, RenderError};
use crate::git::RevisionRange;
use crate::notes::{DiscoverMode, Gatherer, Options, create_document, render_markdown};

use super::{NotesProducer, ProduceContext};

/// Renders release notes without leaving the process.
#[derive(Debug, Clone)]
pub struct GathererProducer {
    pub github_org: String,
    pub github_repo: String,
    pub fetch_prs: bool,
}

impl GathererProducer {
    /// Gatherer options for `range`; the caller fixes the range, so nothing
    /// is discovered.
    pub fn options_for(&self, range: &RevisionRange, ctx: &ProduceContext) -> Options {
        Options {
            discover_mode: DiscoverMode::None,
            github_org: self.github_org.clone(),
            github_repo: self.github_repo.clone(),
            repo_path: ctx.work_dir.clone(),
            github_token: ctx.github_token.clone(),
            start_rev: range.start.clone(),
            end_sha: range.end.clone(),
            end_rev: String::new(),
            fetch_prs: self.fetch_prs,
        }
    }
}

#[async_trait]
impl NotesProducer for GathererProducer {
    async fn produce(
        &self,
        range: &RevisionRange,
        ctx: &ProduceContext,
    ) -> Result<String, ProduceError> {
        let mut options = self.options_for(range, ctx);
        options.validate_and_finish()?;

        info!(
            workdir = %ctx.work_dir.display(),
            start = %options.start_rev,
            end = %options.end_sha,
            fetch_prs = options.fetch_prs,
            "Gathering release notes in process"
        );

        let gatherer = Gatherer::new(options);
        let gathered = gatherer
            .list_release_notes()
            .await
            .map_err(RenderError::Gathering)?;

        let options = gatherer.options();
        let doc = create_document(&gathered, &options.github_org, &options.github_repo);
        let markdown = render_markdown(&doc, &options.start_rev, &options.end_rev)?;

        Ok(markdown)
    }
}
