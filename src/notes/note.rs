//! Release note entries and how they are derived from commits and PRs.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::git::{CommitType, ParsedCommit};
use crate::github::PullRequest;

/// Kind of change a release note describes.
///
/// Declaration order is rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Deprecation,
    Feature,
    Bug,
    Documentation,
    Cleanup,
    Uncategorized,
}

impl NoteKind {
    /// Section heading for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deprecation => "Deprecation",
            Self::Feature => "Feature",
            Self::Bug => "Bug or Regression",
            Self::Documentation => "Documentation",
            Self::Cleanup => "Other (Cleanup or Flake)",
            Self::Uncategorized => "Uncategorized",
        }
    }

    /// Kind from a `kind/<x>` PR label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.strip_prefix("kind/")? {
            "deprecation" | "api-change" => Some(Self::Deprecation),
            "feature" => Some(Self::Feature),
            "bug" | "regression" => Some(Self::Bug),
            "documentation" => Some(Self::Documentation),
            "cleanup" | "flake" | "failing-test" => Some(Self::Cleanup),
            _ => None,
        }
    }

    /// Kind implied by a conventional commit type.
    pub fn from_commit_type(commit_type: Option<CommitType>) -> Self {
        match commit_type {
            Some(CommitType::Feat) => Self::Feature,
            Some(CommitType::Fix) => Self::Bug,
            Some(CommitType::Docs) => Self::Documentation,
            Some(
                CommitType::Refactor
                | CommitType::Chore
                | CommitType::Style
                | CommitType::Test
                | CommitType::Build
                | CommitType::Ci
                | CommitType::Perf,
            ) => Self::Cleanup,
            None => Self::Uncategorized,
        }
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single release note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNote {
    pub commit: String,
    pub pr_number: Option<u64>,
    pub text: String,
    pub kind: NoteKind,
    pub author: Option<String>,
    pub pr_url: Option<String>,
}

static RELEASE_NOTE_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```release-note[^\n]*\n(.*?)```").expect("release-note block pattern is valid")
});

/// What a PR body says about its release note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBlock {
    /// The PR opted out (`NONE` or an empty block).
    OptedOut,
    Text(String),
}

/// Extract the fenced ```` ```release-note ```` block from a PR body.
///
/// Returns `None` when the body has no such block.
pub fn extract_release_note_block(body: &str) -> Option<NoteBlock> {
    let normalized = body.replace("\r\n", "\n");
    let caps = RELEASE_NOTE_BLOCK_RE.captures(&normalized)?;
    let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");

    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        Some(NoteBlock::OptedOut)
    } else {
        Some(NoteBlock::Text(text.to_string()))
    }
}

/// Build the note for a commit, optionally enriched with its PR.
///
/// Returns `None` when the PR opted out of release notes, or for merge
/// commits that carry no PR reference.
pub fn note_for_commit(commit: &ParsedCommit, pr: Option<&PullRequest>) -> Option<ReleaseNote> {
    let Some(pr) = pr else {
        if commit.is_merge && commit.pr_number.is_none() {
            return None;
        }
        return Some(ReleaseNote {
            commit: commit.hash.clone(),
            pr_number: commit.pr_number,
            text: commit.description(),
            kind: NoteKind::from_commit_type(commit.commit_type),
            author: None,
            pr_url: None,
        });
    };

    let text = match pr.body.as_deref().and_then(extract_release_note_block) {
        Some(NoteBlock::OptedOut) => return None,
        Some(NoteBlock::Text(text)) => text,
        None => pr.title.trim().to_string(),
    };

    let kind = pr
        .labels
        .iter()
        .filter_map(|label| NoteKind::from_label(label))
        .min()
        .unwrap_or_else(|| NoteKind::from_commit_type(commit.commit_type));

    Some(ReleaseNote {
        commit: commit.hash.clone(),
        pr_number: Some(pr.number),
        text,
        kind,
        author: pr.author.clone(),
        pr_url: pr.html_url.clone(),
    })
}
