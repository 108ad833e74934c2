//! In-memory release host

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use brew_release_notes::release::error::HostError;
use brew_release_notes::release::host::ReleaseHost;
use brew_release_notes::repository::{HostKind, RepositoryCoordinate};
use brew_release_notes::version::types::Tag;

/// Release host serving canned tags and notes, keyed by `owner/name`
pub struct FakeReleaseHost {
    kind: HostKind,
    tags: HashMap<String, Vec<Tag>>,
    notes: HashMap<(String, String), String>,
    note_requests: Arc<Mutex<Vec<String>>>,
}

impl FakeReleaseHost {
    pub fn new(kind: HostKind) -> Self {
        Self {
            kind,
            tags: HashMap::new(),
            notes: HashMap::new(),
            note_requests: Arc::default(),
        }
    }

    pub fn with_tags(mut self, slug: &str, tags: &[&str]) -> Self {
        self.tags.insert(
            slug.to_string(),
            tags.iter().map(|tag| Tag::from_name(*tag)).collect(),
        );
        self
    }

    pub fn with_note(mut self, slug: &str, tag: &str, note: &str) -> Self {
        self.notes
            .insert((slug.to_string(), tag.to_string()), note.to_string());
        self
    }

    /// Handle to the tags whose notes were requested, in request order
    pub fn note_requests(&self) -> Arc<Mutex<Vec<String>>> {
        self.note_requests.clone()
    }
}

#[async_trait]
impl ReleaseHost for FakeReleaseHost {
    fn host_kind(&self) -> HostKind {
        self.kind
    }

    async fn fetch_tags(&self, repository: &RepositoryCoordinate) -> Result<Vec<Tag>, HostError> {
        self.tags
            .get(&repository.slug())
            .cloned()
            .ok_or_else(|| HostError::NotFound(repository.slug()))
    }

    async fn fetch_note(
        &self,
        repository: &RepositoryCoordinate,
        tag: &str,
    ) -> Result<Option<String>, HostError> {
        self.note_requests.lock().unwrap().push(tag.to_string());
        Ok(self
            .notes
            .get(&(repository.slug(), tag.to_string()))
            .cloned())
    }
}
