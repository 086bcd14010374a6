//! Tag enumeration and release tag matching.

use std::collections::HashMap;
use std::sync::LazyLock;

use git2::{Oid, Repository};
use regex_lite::Regex;
use tracing::{debug, warn};

use crate::error::GitError;

/// Pattern a tag must match, anchor to anchor, to count as a release tag.
pub const RELEASE_TAG_PATTERN: &str = r"^v\d+\.\d+\.\d+$";

static RELEASE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RELEASE_TAG_PATTERN).expect("release tag pattern is valid"));

/// Whether `name` is a release tag (`v<major>.<minor>.<patch>`, nothing else).
pub fn is_release_tag(name: &str) -> bool {
    RELEASE_TAG_RE.is_match(name)
}

/// Keep only release tags.
///
/// Relative order is preserved and duplicates are kept; no version
/// comparison happens here.
pub fn filter_release_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    tags.iter()
        .map(AsRef::as_ref)
        .filter(|tag| is_release_tag(tag))
        .map(str::to_string)
        .collect()
}

/// Map every tag in the repository to the commit it points at.
///
/// Annotated tags are peeled to their target commit.
pub fn tags_by_commit(repo: &Repository) -> Result<HashMap<Oid, Vec<String>>, GitError> {
    let mut tags: HashMap<Oid, Vec<String>> = HashMap::new();

    repo.tag_foreach(|oid, name_bytes| {
        let Ok(name_str) = std::str::from_utf8(name_bytes) else {
            warn!("Skipping tag with OID {} - name is not valid UTF-8", oid);
            return true;
        };
        let name = name_str
            .strip_prefix("refs/tags/")
            .unwrap_or(name_str)
            .to_string();

        let target = match repo
            .find_object(oid, None)
            .and_then(|obj| obj.peel_to_commit())
        {
            Ok(commit) => commit.id(),
            Err(e) => {
                debug!(tag = %name, error = %e, "Tag does not point at a commit, skipping");
                return true;
            }
        };

        tags.entry(target).or_default().push(name);
        true
    })
    .map_err(GitError::TagsError)?;

    Ok(tags)
}
