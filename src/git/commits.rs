//! Commit walking and commit message parsing.

use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, Oid, Repository, Sort};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::error::GitError;

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "style" => Ok(Self::Style),
            "refactor" => Ok(Self::Refactor),
            "perf" => Ok(Self::Perf),
            "test" => Ok(Self::Test),
            "build" => Ok(Self::Build),
            "ci" => Ok(Self::Ci),
            "chore" => Ok(Self::Chore),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

static CONVENTIONAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)(?:\(([^)]+)\))?(!)?\s*:\s*").expect("conventional commit pattern is valid")
});

static MERGE_PR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Merge pull request #(\d+)\b").expect("merge pull request pattern is valid")
});

static SQUASH_PR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)\s*$").expect("squash PR pattern is valid"));

/// A commit in the range being summarized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCommit {
    pub hash: String,
    pub message: String,
    pub subject: String,
    pub author: String,
    pub commit_type: Option<CommitType>,
    pub scope: Option<String>,
    pub breaking: bool,
    pub pr_number: Option<u64>,
    pub is_merge: bool,
    pub timestamp: DateTime<Utc>,
}

impl ParsedCommit {
    /// Create a ParsedCommit from a git2 Commit.
    pub fn from_git2_commit(commit: &Commit) -> Self {
        let hash = commit.id().to_string();
        let message = commit.message().unwrap_or("").to_string();
        let subject = message.lines().next().unwrap_or("").trim().to_string();
        let author = commit.author().name().unwrap_or("unknown").to_string();
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .unwrap_or_else(Utc::now);

        let (commit_type, scope, breaking) = parse_commit_message(&message);
        let pr_number = extract_pr_number(&subject);

        Self {
            hash,
            message,
            subject,
            author,
            commit_type,
            scope,
            breaking,
            pr_number,
            is_merge: commit.parent_count() > 1,
            timestamp,
        }
    }

    /// The first seven characters of the commit id.
    pub fn short_hash(&self) -> &str {
        self.hash.get(..7).unwrap_or(&self.hash)
    }

    /// The subject line with any conventional-commit prefix and trailing PR
    /// reference removed.
    pub fn description(&self) -> String {
        let stripped = match CONVENTIONAL_RE.find(&self.subject) {
            Some(m) if self.commit_type.is_some() => &self.subject[m.end()..],
            _ => self.subject.as_str(),
        };
        SQUASH_PR_RE.replace(stripped, "").trim().to_string()
    }
}

/// Parse a conventional commit message.
/// Returns (commit_type, scope, breaking).
pub fn parse_commit_message(message: &str) -> (Option<CommitType>, Option<String>, bool) {
    let first_line = message.lines().next().unwrap_or("");

    let breaking_in_footer =
        message.contains("BREAKING CHANGE:") || message.contains("BREAKING-CHANGE:");

    if let Some(caps) = CONVENTIONAL_RE.captures(first_line) {
        let type_str = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let scope = caps.get(2).map(|m| m.as_str().to_string());
        let breaking_mark = caps.get(3).is_some();

        let commit_type = type_str.parse::<CommitType>().ok();
        let breaking = breaking_mark || breaking_in_footer;

        return (commit_type, scope, breaking);
    }

    (None, None, breaking_in_footer)
}

/// Pull request number referenced by a commit subject.
///
/// Recognizes GitHub merge commits (`Merge pull request #123 from ...`) and
/// squash merges (`Some change (#123)`).
pub fn extract_pr_number(subject: &str) -> Option<u64> {
    MERGE_PR_RE
        .captures(subject)
        .or_else(|| SQUASH_PR_RE.captures(subject))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Resolve a reference (tag, branch, commit hash) to a commit OID.
pub fn resolve_reference(repo: &Repository, reference: &str) -> Result<Oid, GitError> {
    if let Ok(oid) = Oid::from_str(reference) {
        if repo.find_commit(oid).is_ok() {
            return Ok(oid);
        }
    }

    match repo.revparse_single(reference) {
        Ok(obj) => Ok(obj.peel_to_commit().map_err(GitError::ParseCommit)?.id()),
        Err(e) => Err(GitError::ReferenceNotFound(reference.to_string(), e)),
    }
}

/// Fetch commits reachable from `to_oid` but not from `from_oid`, newest first.
pub fn fetch_commits(
    repo: &Repository,
    from_oid: Oid,
    to_oid: Oid,
) -> Result<Vec<ParsedCommit>, GitError> {
    let mut revwalk = repo.revwalk().map_err(GitError::RevwalkError)?;

    revwalk.push(to_oid).map_err(GitError::RevwalkError)?;
    revwalk.hide(from_oid).map_err(GitError::RevwalkError)?;
    revwalk
        .set_sorting(Sort::TOPOLOGICAL | Sort::TIME)
        .map_err(GitError::RevwalkError)?;

    let mut commits = Vec::new();

    for oid_result in revwalk {
        let oid = oid_result.map_err(GitError::RevwalkError)?;
        let commit = repo.find_commit(oid).map_err(GitError::ParseCommit)?;
        commits.push(ParsedCommit::from_git2_commit(&commit));
    }

    Ok(commits)
}
