//! ReleaseHost trait for fetching tags and release notes from hosting providers

use std::collections::HashMap;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::release::error::HostError;
use crate::repository::host::{HostKind, RepositoryCoordinate};
use crate::version::types::Tag;

/// Trait for querying releases on a hosting provider
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Returns the kind of host this implementation handles
    fn host_kind(&self) -> HostKind;

    /// Fetches the published tags of a repository
    ///
    /// # Returns
    /// * `Ok(Vec<Tag>)` - Tags in the order the host lists them (usually newest first)
    /// * `Err(HostError)` - If the fetch fails
    async fn fetch_tags(&self, repository: &RepositoryCoordinate) -> Result<Vec<Tag>, HostError>;

    /// Fetches the release notes for a single tag
    ///
    /// # Returns
    /// * `Ok(Some(text))` - Notes written for the tag
    /// * `Ok(None)` - The tag has no release or the release has no text
    /// * `Err(HostError)` - If the fetch fails
    async fn fetch_note(
        &self,
        repository: &RepositoryCoordinate,
        tag: &str,
    ) -> Result<Option<String>, HostError>;
}

/// Release clients keyed by the host kind they serve
#[derive(Default, Clone)]
pub struct ReleaseHosts {
    hosts: HashMap<HostKind, Arc<dyn ReleaseHost>>,
}

impl ReleaseHosts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client, replacing any previous client for the same kind
    pub fn with(mut self, host: Arc<dyn ReleaseHost>) -> Self {
        self.hosts.insert(host.host_kind(), host);
        self
    }

    /// Client for the repository's host, if its host is supported and registered
    pub fn for_repository(
        &self,
        repository: &RepositoryCoordinate,
    ) -> Option<&Arc<dyn ReleaseHost>> {
        repository
            .host
            .kind()
            .and_then(|kind| self.hosts.get(&kind))
    }
}
