//! Common types for package manager data

/// Kind of installable unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageKind {
    /// Source-buildable formula
    Formula,
    /// Prebuilt binary bundle
    Cask,
}

/// An installed package with a newer version available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedPackage {
    /// Package name (e.g., "ripgrep", "homebrew/cask/firefox")
    pub name: String,
    pub kind: PackageKind,
    /// Installed versions, oldest first
    pub installed_versions: Vec<String>,
    /// Latest version known to the package manager
    pub current_version: Option<String>,
}

impl OutdatedPackage {
    /// The installed version in upstream form.
    ///
    /// Uses the most recent installed version with the Homebrew revision (`1.2.0_1`)
    /// and cask build (`1.2.0,abc123`) suffixes stripped.
    pub fn installed_version(&self) -> Option<&str> {
        self.installed_versions
            .last()
            .map(|version| upstream_version(version))
    }

    pub fn latest_version(&self) -> Option<&str> {
        self.current_version
            .as_deref()
            .map(upstream_version)
    }
}

/// Metadata of a single package
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageInfo {
    pub name: String,
    pub homepage: Option<String>,
    /// Source tarball (formula) or download URL (cask)
    pub stable_url: Option<String>,
    /// Version-control checkout URL
    pub head_url: Option<String>,
}

impl PackageInfo {
    /// URLs to inspect for a repository, in priority order: homepage, stable, head
    pub fn candidate_urls(&self) -> Vec<&str> {
        [&self.homepage, &self.stable_url, &self.head_url]
            .into_iter()
            .filter_map(|url| url.as_deref())
            .filter(|url| !url.trim().is_empty())
            .collect()
    }
}

/// Strip Homebrew-specific suffixes from a version string
pub fn upstream_version(version: &str) -> &str {
    let version = version.split(',').next().unwrap_or(version);
    match version.rsplit_once('_') {
        Some((base, revision))
            if !revision.is_empty() && revision.chars().all(|c| c.is_ascii_digit()) =>
        {
            base
        }
        _ => version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.2.0", "1.2.0")]
    #[case("1.2.0_1", "1.2.0")]
    #[case("1.2.0_12", "1.2.0")]
    #[case("130.0,20240901", "130.0")]
    #[case("1.2.0_beta", "1.2.0_beta")]
    #[case("2024_01", "2024")]
    fn upstream_version_strips_homebrew_suffixes(#[case] version: &str, #[case] expected: &str) {
        assert_eq!(upstream_version(version), expected);
    }

    #[test]
    fn installed_version_uses_last_installed() {
        let package = OutdatedPackage {
            name: "foo".to_string(),
            kind: PackageKind::Formula,
            installed_versions: vec!["1.0.0".to_string(), "1.2.0_1".to_string()],
            current_version: Some("1.4.0".to_string()),
        };

        assert_eq!(package.installed_version(), Some("1.2.0"));
        assert_eq!(package.latest_version(), Some("1.4.0"));
    }

    #[test]
    fn candidate_urls_follow_priority_and_skip_missing() {
        let info = PackageInfo {
            name: "baz".to_string(),
            homepage: Some("https://example.com".to_string()),
            stable_url: None,
            head_url: Some("https://github.com/acme/baz.git".to_string()),
        };

        assert_eq!(
            info.candidate_urls(),
            vec!["https://example.com", "https://github.com/acme/baz.git"]
        );
    }
}
