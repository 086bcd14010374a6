//! Grouping release notes into a document and rendering it as markdown.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::RenderError;

use super::gatherer::GatheredNotes;
use super::note::{NoteKind, ReleaseNote};

/// Release notes grouped by kind.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotesDocument {
    pub github_org: String,
    pub github_repo: String,
    pub sections: BTreeMap<NoteKind, Vec<ReleaseNote>>,
}

impl NotesDocument {
    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }
}

/// Group gathered notes by kind, keeping history order within each kind.
pub fn create_document(gathered: &GatheredNotes, github_org: &str, github_repo: &str) -> NotesDocument {
    let mut sections: BTreeMap<NoteKind, Vec<ReleaseNote>> = BTreeMap::new();
    for note in &gathered.notes {
        sections.entry(note.kind).or_default().push(note.clone());
    }

    NotesDocument {
        github_org: github_org.to_string(),
        github_repo: github_repo.to_string(),
        sections,
    }
}

/// Render the document as markdown for the range `start_rev..end_rev`.
pub fn render_markdown(
    doc: &NotesDocument,
    start_rev: &str,
    end_rev: &str,
) -> Result<String, RenderError> {
    if start_rev.is_empty() || end_rev.is_empty() {
        return Err(RenderError::Rendering(
            "start and end revisions are required".to_string(),
        ));
    }

    let mut out = format!("## Changelog since {}\n\n", start_rev);
    out.push_str(&format!(
        "Changes from `{}` to `{}`.\n\n",
        start_rev, end_rev
    ));

    if doc.is_empty() {
        out.push_str("_No release notes found._");
        return Ok(out);
    }

    out.push_str("## Changes by Kind\n\n");

    for (kind, notes) in &doc.sections {
        if notes.is_empty() {
            continue;
        }
        out.push_str(&format!("### {}\n\n", kind));
        for note in notes {
            out.push_str(&format_note(doc, note));
            out.push('\n');
        }
        out.push('\n');
    }

    Ok(out.trim_end().to_string())
}

fn format_note(doc: &NotesDocument, note: &ReleaseNote) -> String {
    let mut lines = note.text.lines();
    let mut entry = format!("- {}", lines.next().unwrap_or("").trim_end());
    for line in lines {
        entry.push('\n');
        if !line.trim().is_empty() {
            entry.push_str("  ");
            entry.push_str(line.trim_end());
        }
    }

    let reference = match note.pr_number {
        Some(number) => {
            let url = note.pr_url.clone().unwrap_or_else(|| {
                format!(
                    "https://github.com/{}/{}/pull/{}",
                    doc.github_org, doc.github_repo, number
                )
            });
            match &note.author {
                Some(author) => format!(
                    "[#{}]({}), [@{}](https://github.com/{})",
                    number, url, author, author
                ),
                None => format!("[#{}]({})", number, url),
            }
        }
        None => note.commit.get(..7).unwrap_or(&note.commit).to_string(),
    };

    format!("{} ({})", entry, reference)
}
