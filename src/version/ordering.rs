//! Version-aware ordering for upstream tag strings
//!
//! Upstream tags are not guaranteed to be semver (`2024.01.15`, `1.2`, `3.0.0rc1`),
//! so ordering follows "natural version sort" semantics instead: digit runs are
//! compared numerically and everything else character by character.

use std::cmp::Ordering;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

/// Pre-release markers for tags that semver cannot parse (e.g. "3.0.0rc1")
static PRERELEASE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d[.\-_]?(alpha|beta|rc|pre|preview|dev)[.\-_]?\d*$")
        .expect("valid prerelease regex")
});

/// Strip one optional leading non-digit prefix character ("v1.2.0" -> "1.2.0").
pub fn normalize_version(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.chars().next() {
        Some(c) if !c.is_ascii_digit() => &raw[c.len_utf8()..],
        _ => raw,
    }
}

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Handles partial versions like "1" or "1.2" by padding with zeros.
/// Does NOT strip 'v' prefix (use `normalize_version` first if needed).
pub fn parse_version(version: &str) -> Option<Version> {
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Whether a raw tag looks like a pre-release, for hosts that do not flag them.
pub fn is_prerelease(raw: &str) -> bool {
    let normalized = normalize_version(raw);
    match parse_version(normalized) {
        Some(version) => !version.pre.is_empty(),
        None => PRERELEASE_MARKER.is_match(normalized),
    }
}

/// Compare two normalized version strings.
///
/// Non-digit runs compare character-wise with `~` < end-of-string < letters < others,
/// digit runs compare numerically regardless of length. Strings that only differ in
/// leading zeros fall back to plain string order so the ordering stays total.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    compare_natural(a.as_bytes(), b.as_bytes()).then_with(|| a.cmp(b))
}

fn compare_natural(a: &[u8], b: &[u8]) -> Ordering {
    let (mut i, mut j) = (0, 0);

    while i < a.len() || j < b.len() {
        while is_non_digit(a, i) || is_non_digit(b, j) {
            let ordering = char_rank(a.get(i)).cmp(&char_rank(b.get(j)));
            if ordering != Ordering::Equal {
                return ordering;
            }
            i += 1;
            j += 1;
        }

        while a.get(i) == Some(&b'0') {
            i += 1;
        }
        while b.get(j) == Some(&b'0') {
            j += 1;
        }

        let mut first_diff = Ordering::Equal;
        while is_digit(a, i) && is_digit(b, j) {
            if first_diff == Ordering::Equal {
                first_diff = a[i].cmp(&b[j]);
            }
            i += 1;
            j += 1;
        }

        // a longer digit run is the larger number
        if is_digit(a, i) {
            return Ordering::Greater;
        }
        if is_digit(b, j) {
            return Ordering::Less;
        }
        if first_diff != Ordering::Equal {
            return first_diff;
        }
    }

    Ordering::Equal
}

fn is_digit(s: &[u8], i: usize) -> bool {
    s.get(i).is_some_and(u8::is_ascii_digit)
}

fn is_non_digit(s: &[u8], i: usize) -> bool {
    s.get(i).is_some_and(|c| !c.is_ascii_digit())
}

fn char_rank(c: Option<&u8>) -> i32 {
    match c {
        None => 0,
        Some(b'~') => -1,
        Some(c) if c.is_ascii_digit() => 0,
        Some(c) if c.is_ascii_alphabetic() => i32::from(*c),
        Some(c) => i32::from(*c) + 256,
    }
}

/// A normalized version string ordered by [`compare_versions`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionKey(String);

impl VersionKey {
    pub fn new(normalized: &str) -> Self {
        Self(normalized.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for VersionKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.0, &other.0)
    }
}

impl PartialOrd for VersionKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
