//! Revision range resolution.

use serde::Serialize;
use tracing::debug;

use crate::error::{RepoQuery, ResolveError};

use super::repo::Repo;
use super::tags::{RELEASE_TAG_PATTERN, filter_release_tags};

/// Range of history to summarize: from the last release tag to the branch head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionRange {
    pub branch: String,
    pub start: String,
    pub end: String,
}

/// Resolve the revision range for the checked-out branch.
///
/// The start is the first release tag reported by [`Repo::tags_for_branch`];
/// no version comparison is done, so the accessor must list tags newest
/// first. The end is the current head. Queries stop at the first failure.
pub fn resolve_range<R: Repo + ?Sized>(repo: &R) -> Result<RevisionRange, ResolveError> {
    let branch = repo
        .current_branch()
        .map_err(ResolveError::repository(RepoQuery::CurrentBranch))?;

    let tags = repo
        .tags_for_branch(&branch)
        .map_err(ResolveError::repository(RepoQuery::TagsForBranch))?;

    let start = filter_release_tags(&tags)
        .into_iter()
        .next()
        .ok_or_else(|| ResolveError::NoReleaseTagFound {
            pattern: RELEASE_TAG_PATTERN.to_string(),
            branch: branch.clone(),
        })?;

    let end = repo
        .head()
        .map_err(ResolveError::repository(RepoQuery::Head))?;

    debug!(branch = %branch, start = %start, end = %end, "Resolved revision range");

    Ok(RevisionRange { branch, start, end })
}
