//! Hosting provider classification for package URLs

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::GITLAB_DOMAIN_PREFIX;

/// scheme (with optional `git+`), optional credentials and `www.`, domain, optional port, path
static REPOSITORY_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:git\+)?(?:https?|git|ssh)://(?:[^@/]+@)?(?:www\.)?([^/:?#]+)(?::\d+)?/([^?#]*)")
        .expect("valid repository url regex")
});

const GITHUB_DOMAIN: &str = "github.com";

/// Hosting provider a repository lives on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Host {
    /// github.com
    GitHub,
    /// A GitLab instance; the domain differs per installation
    GitLab { domain: String },
    /// Anything we cannot fetch release notes from
    Unsupported,
}

/// Host kind without per-installation data, used to pick a release client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostKind {
    GitHub,
    GitLab,
}

impl Host {
    pub fn kind(&self) -> Option<HostKind> {
        match self {
            Host::GitHub => Some(HostKind::GitHub),
            Host::GitLab { .. } => Some(HostKind::GitLab),
            Host::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Host::Unsupported)
    }

    /// Domain serving the repository's web pages and API
    pub fn domain(&self) -> Option<&str> {
        match self {
            Host::GitHub => Some(GITHUB_DOMAIN),
            Host::GitLab { domain } => Some(domain),
            Host::Unsupported => None,
        }
    }
}

/// Repository identity on a hosting provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryCoordinate {
    pub host: Host,
    pub owner: String,
    pub name: String,
}

impl RepositoryCoordinate {
    pub fn new(host: Host, owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host,
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Coordinate for a package we cannot fetch from; owner and name stay empty
    pub fn unsupported() -> Self {
        Self::new(Host::Unsupported, "", "")
    }

    pub fn is_supported(&self) -> bool {
        self.host.is_supported()
    }

    /// "owner/name"
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.host.domain() {
            Some(domain) => write!(f, "{}/{}/{}", domain, self.owner, self.name),
            None => write!(f, "unsupported"),
        }
    }
}

/// Domain patterns recognised as supported hosts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPatterns {
    /// Exact GitLab domains in addition to anything starting with `gitlab.`
    gitlab_hosts: Vec<String>,
}

impl HostPatterns {
    pub fn new(gitlab_hosts: Vec<String>) -> Self {
        Self {
            gitlab_hosts: gitlab_hosts
                .into_iter()
                .map(|host| host.trim().to_ascii_lowercase())
                .collect(),
        }
    }

    /// Classify a bare domain
    pub fn classify_domain(&self, domain: &str) -> Host {
        let domain = domain.to_ascii_lowercase();
        if domain == GITHUB_DOMAIN {
            Host::GitHub
        } else if domain.starts_with(GITLAB_DOMAIN_PREFIX) || self.gitlab_hosts.contains(&domain) {
            Host::GitLab { domain }
        } else {
            Host::Unsupported
        }
    }

    /// Extract a repository coordinate from a URL on a supported host.
    ///
    /// Takes the first two path segments as owner and name and strips a trailing
    /// `.git`. Returns `None` for unsupported hosts and paths shorter than two segments.
    pub fn parse_url(&self, url: &str) -> Option<RepositoryCoordinate> {
        let captures = REPOSITORY_URL.captures(url.trim())?;
        let host = self.classify_domain(&captures[1]);
        if !host.is_supported() {
            return None;
        }

        let mut segments = captures[2].split('/').filter(|s| !s.is_empty());
        let owner = segments.next()?;
        let name = segments.next()?;
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            return None;
        }

        Some(RepositoryCoordinate::new(host, owner, name))
    }
}
