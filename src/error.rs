//! Error types for patchnotes modules using thiserror.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Failed to open repository")]
    OpenRepository(#[source] git2::Error),

    #[error("HEAD is detached; check out a release branch first")]
    DetachedHead,

    #[error("Failed to find reference '{0}'")]
    ReferenceNotFound(String, #[source] git2::Error),

    #[error("Failed to parse commit")]
    ParseCommit(#[source] git2::Error),

    #[error("Failed to walk commit history")]
    RevwalkError(#[source] git2::Error),

    #[error("Failed to enumerate tags")]
    TagsError(#[source] git2::Error),
}

/// The repository query that was running when resolution failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoQuery {
    Open,
    CurrentBranch,
    TagsForBranch,
    Head,
}

impl RepoQuery {
    pub fn as_str(&self) -> &'static str {
        match self {
            RepoQuery::Open => "opening repo",
            RepoQuery::CurrentBranch => "getting current checked out branch",
            RepoQuery::TagsForBranch => "getting tags on current branch",
            RepoQuery::Head => "getting head of current branch",
        }
    }
}

impl fmt::Display for RepoQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from revision range resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{query}")]
    Repository {
        query: RepoQuery,
        #[source]
        source: GitError,
    },

    #[error("could not find a release tag (\"{pattern}\") on the current branch '{branch}'")]
    NoReleaseTagFound { pattern: String, branch: String },
}

impl ResolveError {
    pub(crate) fn repository(query: RepoQuery) -> impl FnOnce(GitError) -> Self {
        move |source| ResolveError::Repository { query, source }
    }
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to fetch PR #{number}")]
    FetchPR {
        number: u64,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Failed to build GitHub client")]
    Client(#[source] Box<octocrab::Error>),

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Not found on GitHub: {owner}/{repo}#{number}")]
    NotFound {
        owner: String,
        repo: String,
        number: u64,
    },

    #[error("Failed to parse repository URL")]
    InvalidRepositoryUrl,
}

/// Errors raised while walking history and collecting notes.
#[derive(Error, Debug)]
pub enum GatherError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),
}

/// Errors from the in-process note renderer, tagged with the failing stage.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("validating release notes options: {0}")]
    Validating(String),

    #[error("validating release notes options: discovering revisions")]
    Discovering(#[source] ResolveError),

    #[error("listing release notes")]
    Gathering(#[source] GatherError),

    #[error("rendering release notes to markdown: {0}")]
    Rendering(String),
}

/// Errors from running the external release notes tool.
#[derive(Error, Debug)]
pub enum ExternalToolError {
    #[error("release notes tool not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("bash not found on PATH; it is required to run the release notes tool")]
    ShellNotFound,

    #[error("could not determine absolute path of the release notes tool")]
    ToolPath(#[source] std::io::Error),

    #[error("could not create temporary markdown file")]
    TempFile(#[source] std::io::Error),

    #[error("failed to spawn release notes tool")]
    SpawnFailed(#[source] std::io::Error),

    #[error("failed waiting for release notes tool")]
    Wait(#[source] std::io::Error),

    #[error("release notes tool timed out after {0:?}")]
    Timeout(Duration),

    #[error("release notes tool exited with {}", exit_code.map_or("unknown status".to_string(), |c| format!("code {c}")))]
    NonZeroExit {
        exit_code: Option<i32>,
        stderr: String,
        bin_path: PathBuf,
        work_dir: PathBuf,
    },
}

impl ExternalToolError {
    /// Short, user-facing message.
    pub fn summary(&self) -> String {
        self.to_string()
    }

    /// Everything known about the failure, including captured stderr.
    pub fn full_error(&self) -> String {
        match self {
            ExternalToolError::NonZeroExit {
                stderr,
                bin_path,
                work_dir,
                ..
            } => format!(
                "{}\n  binary: {}\n  workdir: {}\n  stderr:\n{}",
                self,
                bin_path.display(),
                work_dir.display(),
                indent(stderr.trim_end())
            ),
            ExternalToolError::ToolPath(e)
            | ExternalToolError::TempFile(e)
            | ExternalToolError::SpawnFailed(e)
            | ExternalToolError::Wait(e) => {
                format!("{}: {} (io error kind: {:?})", self, e, e.kind())
            }
            _ => self.to_string(),
        }
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Errors from a notes producer strategy.
#[derive(Error, Debug)]
pub enum ProduceError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    ExternalTool(#[from] ExternalToolError),
}

/// Top-level error returned when drafting release notes.
#[derive(Error, Debug)]
pub enum ReleaseNotesError {
    #[error("resolving revision range")]
    Resolve(#[from] ResolveError),

    #[error("gathering release notes")]
    Produce(#[from] ProduceError),
}
