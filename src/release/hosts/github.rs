//! GitHub Releases API host implementation

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TAGS_PER_PAGE;
use crate::release::error::HostError;
use crate::release::host::ReleaseHost;
use crate::release::hosts::{check_status, endpoint};
use crate::repository::host::{HostKind, RepositoryCoordinate};
use crate::version::types::Tag;

/// Default base URL for GitHub API
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Response from GitHub Releases API
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
    body: Option<String>,
}

/// Response from GitHub Tags API
#[derive(Debug, Deserialize)]
struct GitTag {
    name: String,
}

/// Host implementation for the GitHub REST API
pub struct GitHubHost {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubHost {
    /// Creates a new GitHubHost with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("brew-release-notes")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.to_string(),
            token: None,
        }
    }

    /// Authenticate requests, raising the API rate limit
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    async fn get(&self, url: reqwest::Url) -> Result<reqwest::Response, HostError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        repository: &RepositoryCoordinate,
        resource: &str,
    ) -> Result<Vec<T>, HostError> {
        let mut url = endpoint(
            &self.base_url,
            &["repos", &repository.owner, &repository.name, resource],
        )?;
        url.query_pairs_mut()
            .append_pair("per_page", &TAGS_PER_PAGE.to_string());

        let response = check_status(self.get(url).await?, &repository.slug())?;

        response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub {} response: {}", resource, e);
            HostError::InvalidResponse(e.to_string())
        })
    }
}

impl Default for GitHubHost {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl ReleaseHost for GitHubHost {
    fn host_kind(&self) -> HostKind {
        HostKind::GitHub
    }

    async fn fetch_tags(&self, repository: &RepositoryCoordinate) -> Result<Vec<Tag>, HostError> {
        let releases: Vec<Release> = self.list(repository, "releases").await?;
        let published: Vec<Tag> = releases
            .into_iter()
            .filter(|release| !release.draft)
            .map(|release| Tag::new(release.tag_name, release.prerelease))
            .collect();

        if !published.is_empty() {
            return Ok(published);
        }

        // Repositories that only push tags still have a version history
        debug!("No published releases for {}, falling back to tags", repository.slug());
        let tags: Vec<GitTag> = self.list(repository, "tags").await?;
        Ok(tags.into_iter().map(|tag| Tag::from_name(tag.name)).collect())
    }

    async fn fetch_note(
        &self,
        repository: &RepositoryCoordinate,
        tag: &str,
    ) -> Result<Option<String>, HostError> {
        let url = endpoint(
            &self.base_url,
            &["repos", &repository.owner, &repository.name, "releases", "tags", tag],
        )?;

        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("No release for {}@{}", repository.slug(), tag);
            return Ok(None);
        }

        let release: Release = check_status(response, &repository.slug())?
            .json()
            .await
            .map_err(|e| {
                warn!("Failed to parse GitHub release response: {}", e);
                HostError::InvalidResponse(e.to_string())
            })?;

        Ok(release.body.filter(|body| !body.trim().is_empty()))
    }
}
