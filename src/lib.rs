//! patchnotes - drafts patch release notes for the checked-out release branch.
//!
//! # Overview
//!
//! patchnotes finds the newest release tag on the current branch, takes the
//! branch head as the end of the range, produces release notes for that range
//! (in process, or through the external `relnotes` tool), and appends the
//! placeholder sections a release manager fills in by hand.

pub mod config;
pub mod document;
pub mod error;
pub mod git;
pub mod github;
pub mod noter;
pub mod notes;
pub mod produce;

// Re-export commonly used types
pub use config::{ConfigOverrides, NoterConfig, Strategy};
pub use document::{Placeholders, assemble, assemble_with};
pub use error::{
    ExternalToolError, GitError, GitHubError, ProduceError, ReleaseNotesError, RenderError,
    ResolveError,
};
pub use git::{Repo, RepoOpener, RevisionRange, resolve_range};
pub use noter::{Draft, ReleaseNoter};
pub use produce::{NotesProducer, ProduceContext};
