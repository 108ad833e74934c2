//! Release note collection with placeholder substitution
//!
//! A missing, empty or failed note never aborts a package: the tag gets
//! [`NO_NOTES_PLACEHOLDER`] instead.

use tracing::debug;

use crate::config::NO_NOTES_PLACEHOLDER;
use crate::console::Reporter;
use crate::release::host::ReleaseHost;
use crate::release::report::ReleaseEntry;
use crate::repository::host::RepositoryCoordinate;
use crate::version::types::Tag;

/// Fetch the note for a single tag, substituting the placeholder when there is none
pub async fn fetch_note_or_placeholder(
    host: &dyn ReleaseHost,
    repository: &RepositoryCoordinate,
    tag: &Tag,
    reporter: &Reporter,
) -> String {
    match host.fetch_note(repository, &tag.raw).await {
        Ok(Some(note)) if !note.trim().is_empty() => note,
        Ok(_) => {
            debug!("No release notes for {}@{}", repository, tag.raw);
            NO_NOTES_PLACEHOLDER.to_string()
        }
        Err(e) => {
            reporter.warn(&format!(
                "Failed to fetch release notes for {}@{}: {}",
                repository, tag.raw, e
            ));
            NO_NOTES_PLACEHOLDER.to_string()
        }
    }
}

/// Fetch notes for every tag, one request at a time, keeping the given order
pub async fn collect_entries(
    host: &dyn ReleaseHost,
    repository: &RepositoryCoordinate,
    tags: &[Tag],
    reporter: &Reporter,
) -> Vec<ReleaseEntry> {
    let mut entries = Vec::with_capacity(tags.len());
    for tag in tags {
        let body = fetch_note_or_placeholder(host, repository, tag, reporter).await;
        entries.push(ReleaseEntry {
            tag: tag.clone(),
            body,
        });
    }
    entries
}
