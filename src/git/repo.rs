//! Read-only repository access.
//!
//! The [`Repo`] trait is the narrow view the resolver needs: the checked-out
//! branch, the tags on it, and the head commit. [`Git2Repo`] backs it with a
//! local working copy; tests substitute their own implementations.

use std::path::Path;

use git2::{BranchType, Repository, Sort};
use tracing::debug;

use crate::error::GitError;

use super::tags::tags_by_commit;

/// Repository queries used to resolve a revision range.
#[cfg_attr(test, mockall::automock)]
pub trait Repo {
    /// Name of the branch currently checked out.
    fn current_branch(&self) -> Result<String, GitError>;

    /// Tags reachable from `branch`, newest first.
    ///
    /// Callers rely on this ordering: the first release tag returned is
    /// taken as the most recent release on the branch.
    fn tags_for_branch(&self, branch: &str) -> Result<Vec<String>, GitError>;

    /// Commit id of the current head.
    fn head(&self) -> Result<String, GitError>;
}

/// Opens a [`Repo`] for a path.
pub trait RepoOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn Repo>, GitError>;
}

impl<F> RepoOpener for F
where
    F: Fn(&Path) -> Result<Box<dyn Repo>, GitError> + Send + Sync,
{
    fn open(&self, path: &Path) -> Result<Box<dyn Repo>, GitError> {
        self(path)
    }
}

/// Default opener backed by git2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2RepoOpener;

impl RepoOpener for Git2RepoOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn Repo>, GitError> {
        Ok(Box::new(Git2Repo::open(path)?))
    }
}

/// [`Repo`] implementation over a local git repository.
pub struct Git2Repo {
    repo: Repository,
}

impl Git2Repo {
    /// Open the repository at `path` (no discovery in parent directories).
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = Repository::open(path).map_err(GitError::OpenRepository)?;
        Ok(Self { repo })
    }

    pub fn from_git2(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn inner(&self) -> &Repository {
        &self.repo
    }
}

impl Repo for Git2Repo {
    fn current_branch(&self) -> Result<String, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::ReferenceNotFound("HEAD".to_string(), e))?;

        if !head.is_branch() {
            return Err(GitError::DetachedHead);
        }

        head.shorthand()
            .map(str::to_string)
            .ok_or(GitError::DetachedHead)
    }

    fn tags_for_branch(&self, branch: &str) -> Result<Vec<String>, GitError> {
        let tip = self
            .repo
            .find_branch(branch, BranchType::Local)
            .map_err(|e| GitError::ReferenceNotFound(branch.to_string(), e))?
            .get()
            .peel_to_commit()
            .map_err(GitError::ParseCommit)?
            .id();

        let mut by_commit = tags_by_commit(&self.repo)?;
        if by_commit.is_empty() {
            debug!(branch, "Repository has no tags");
            return Ok(Vec::new());
        }

        let mut revwalk = self.repo.revwalk().map_err(GitError::RevwalkError)?;
        revwalk.push(tip).map_err(GitError::RevwalkError)?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
            .map_err(GitError::RevwalkError)?;

        let mut tags = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(GitError::RevwalkError)?;
            if let Some(mut names) = by_commit.remove(&oid) {
                names.sort_unstable_by(|a, b| b.cmp(a));
                tags.extend(names);
            }
        }

        debug!(branch, count = tags.len(), "Collected tags reachable from branch");
        Ok(tags)
    }

    fn head(&self) -> Result<String, GitError> {
        let commit = self
            .repo
            .head()
            .map_err(|e| GitError::ReferenceNotFound("HEAD".to_string(), e))?
            .peel_to_commit()
            .map_err(GitError::ParseCommit)?;
        Ok(commit.id().to_string())
    }
}
