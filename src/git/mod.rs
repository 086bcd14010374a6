//! Git operations using git2-rs.

pub mod commits;
pub mod range;
pub mod repo;
pub mod tags;

pub use commits::{CommitType, ParsedCommit, extract_pr_number, parse_commit_message};
pub use range::{RevisionRange, resolve_range};
pub use repo::{Git2Repo, Git2RepoOpener, Repo, RepoOpener};
pub use tags::{RELEASE_TAG_PATTERN, filter_release_tags, is_release_tag};
