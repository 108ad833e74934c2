//! Version window: the published tags strictly newer than the installed version

use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use indexmap::IndexMap;

use crate::console::Reporter;
use crate::version::ordering::{VersionKey, normalize_version};
use crate::version::types::Tag;

/// Outcome of computing the version window for a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionWindow {
    /// Tags newer than the installed version, newest first
    Newer(Vec<Tag>),
    /// Nothing newer than the installed version was published
    UpToDate,
    /// The installed version is blank or not a version at all (e.g. a HEAD build)
    Unrecognized { installed: String },
}

impl VersionWindow {
    pub fn tags(&self) -> &[Tag] {
        match self {
            VersionWindow::Newer(tags) => tags,
            _ => &[],
        }
    }
}

/// Compute the tags strictly newer than `installed`, newest first.
///
/// The installed version is merged into the tag set and acts as the exclusive lower
/// bound, so it does not have to be among the published tags itself. When several raw
/// tags normalize to the same version, the first one in `tags` order is returned.
/// A version with no raw tag behind it is dropped with a warning on `reporter`.
pub fn compute_window(installed: &str, tags: &[Tag], reporter: &Reporter) -> VersionWindow {
    let raw_installed = installed;
    let installed = normalize_version(raw_installed);
    if !installed.starts_with(|c: char| c.is_ascii_digit()) {
        return VersionWindow::Unrecognized {
            installed: raw_installed.trim().to_string(),
        };
    }

    let mut raw_by_version: IndexMap<&str, &Tag> = IndexMap::new();
    for tag in tags {
        raw_by_version.entry(tag.normalized.as_str()).or_insert(tag);
    }

    let floor = VersionKey::new(installed);
    let mut merged: BTreeSet<VersionKey> = tags
        .iter()
        .map(|tag| VersionKey::new(&tag.normalized))
        .collect();
    merged.insert(floor.clone());

    let newer: Vec<Tag> = merged
        .range((Excluded(&floor), Unbounded))
        .rev()
        .filter_map(|key| match raw_by_version.get(key.as_str()) {
            Some(tag) => Some((*tag).clone()),
            None => {
                reporter.warn(&format!("No published tag found for version {}", key.as_str()));
                None
            }
        })
        .collect();

    if newer.is_empty() {
        VersionWindow::UpToDate
    } else {
        VersionWindow::Newer(newer)
    }
}

/// Whether the installed version matches one of the published tags
pub fn installed_is_published(installed: &str, tags: &[Tag]) -> bool {
    let installed = normalize_version(installed);
    tags.iter().any(|tag| tag.normalized == installed)
}
