//! In-process release note gathering and markdown rendering.

pub mod document;
pub mod gatherer;
pub mod note;
pub mod options;

pub use document::{NotesDocument, create_document, render_markdown};
pub use gatherer::{GatheredNotes, Gatherer};
pub use note::{NoteKind, ReleaseNote};
pub use options::{DEFAULT_GITHUB_ORG, DEFAULT_GITHUB_REPO, DiscoverMode, Options};
