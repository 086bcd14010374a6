//! Final document assembly.

/// Separator placed between document sections.
pub const SECTION_SEPARATOR: &str = "\n\n----\n\n";

/// Sections appended after the release notes body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    pub pending_prs: String,
    pub green_build: String,
}

impl Default for Placeholders {
    fn default() -> Self {
        Self {
            pending_prs: "### some pending PRs".to_string(),
            green_build: "### find a green build".to_string(),
        }
    }
}

/// Join the notes body with the default placeholder sections.
pub fn assemble(notes_body: &str) -> String {
    assemble_with(notes_body, &Placeholders::default())
}

/// Join the notes body, pending PRs, and green build sections, in that order.
pub fn assemble_with(notes_body: &str, placeholders: &Placeholders) -> String {
    [
        notes_body,
        placeholders.pending_prs.as_str(),
        placeholders.green_build.as_str(),
    ]
    .join(SECTION_SEPARATOR)
}
