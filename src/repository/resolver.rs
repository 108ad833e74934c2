//! Repository resolution for packages

use thiserror::Error;
use tracing::debug;

use crate::package::types::PackageInfo;
use crate::repository::host::{HostPatterns, RepositoryCoordinate};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("No supported repository found for {package} (checked: {})", format_checked(.checked))]
    Unresolvable {
        package: String,
        checked: Vec<String>,
    },
}

fn format_checked(checked: &[String]) -> String {
    if checked.is_empty() {
        "no URLs".to_string()
    } else {
        checked.join(", ")
    }
}

/// Maps package metadata to the repository that publishes its releases
#[derive(Debug, Clone, Default)]
pub struct RepositoryResolver {
    patterns: HostPatterns,
}

impl RepositoryResolver {
    pub fn new(patterns: HostPatterns) -> Self {
        Self { patterns }
    }

    /// Resolve the repository for a package.
    ///
    /// Candidate URLs are tried homepage first, then stable source, then head; the
    /// first one on a supported host wins and later candidates are never consulted.
    pub fn resolve(&self, package: &PackageInfo) -> Result<RepositoryCoordinate, ResolveError> {
        let candidates = package.candidate_urls();

        for url in &candidates {
            if let Some(coordinate) = self.patterns.parse_url(url) {
                debug!("Resolved {} to {} via {}", package.name, coordinate, url);
                return Ok(coordinate);
            }
        }

        Err(ResolveError::Unresolvable {
            package: package.name.clone(),
            checked: candidates.into_iter().map(str::to_string).collect(),
        })
    }
}
