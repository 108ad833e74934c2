use crate::version::ordering::{is_prerelease, normalize_version};

/// A tag as published by the hosting provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name exactly as published (e.g. "v1.4.0")
    pub raw: String,
    /// Tag name with its prefix character stripped, used for comparison only
    pub normalized: String,
    /// Whether the host (or the tag name) marks this as a pre-release
    pub prerelease: bool,
}

impl Tag {
    pub fn new(raw: impl Into<String>, prerelease: bool) -> Self {
        let raw = raw.into();
        let normalized = normalize_version(&raw).to_string();
        Self {
            raw,
            normalized,
            prerelease,
        }
    }

    /// Build a tag for hosts that do not flag pre-releases, inferring it from the name
    pub fn from_name(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let prerelease = is_prerelease(&raw);
        Self::new(raw, prerelease)
    }
}
