//! GitLab REST API host implementation
//!
//! GitLab instances live on many domains (gitlab.com, gitlab.gnome.org, ...), so the
//! API base is derived from each repository's domain unless overridden.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::TAGS_PER_PAGE;
use crate::release::error::HostError;
use crate::release::host::ReleaseHost;
use crate::release::hosts::{check_status, endpoint};
use crate::repository::host::{Host, HostKind, RepositoryCoordinate};
use crate::version::types::Tag;

/// Response from GitLab Tags API
#[derive(Debug, Deserialize)]
struct GitLabTag {
    name: String,
    commit: Option<GitLabCommit>,
}

#[derive(Debug, Deserialize)]
struct GitLabCommit {
    message: Option<String>,
}

/// Response from GitLab Releases API
#[derive(Debug, Deserialize)]
struct GitLabRelease {
    description: Option<String>,
}

/// Host implementation for GitLab instances
pub struct GitLabHost {
    client: reqwest::Client,
    base_url_override: Option<String>,
    token: Option<String>,
}

impl GitLabHost {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("brew-release-notes")
                .build()
                .expect("Failed to create HTTP client"),
            base_url_override: None,
            token: None,
        }
    }

    /// Send every request to `base_url` instead of the repository's domain
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url_override = Some(base_url.to_string());
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn project_endpoint(
        &self,
        repository: &RepositoryCoordinate,
        resource: &[&str],
    ) -> Result<reqwest::Url, HostError> {
        let base_url = match (&self.base_url_override, &repository.host) {
            (Some(base_url), _) => base_url.clone(),
            (None, Host::GitLab { domain }) => format!("https://{}", domain),
            (None, host) => {
                return Err(HostError::InvalidUrl(format!(
                    "{:?} is not a GitLab host",
                    host
                )));
            }
        };

        let slug = repository.slug();
        let mut segments = vec!["api", "v4", "projects", slug.as_str()];
        segments.extend_from_slice(resource);
        endpoint(&base_url, &segments)
    }

    async fn get(&self, url: reqwest::Url) -> Result<reqwest::Response, HostError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.header("PRIVATE-TOKEN", token);
        }
        Ok(request.send().await?)
    }

    async fn release_description(
        &self,
        repository: &RepositoryCoordinate,
        tag: &str,
    ) -> Result<Option<String>, HostError> {
        let url = self.project_endpoint(repository, &["releases", tag])?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let release: GitLabRelease = check_status(response, &repository.slug())?
            .json()
            .await
            .map_err(|e| HostError::InvalidResponse(e.to_string()))?;
        Ok(release.description)
    }

    async fn tag_commit_message(
        &self,
        repository: &RepositoryCoordinate,
        tag: &str,
    ) -> Result<Option<String>, HostError> {
        let url = self.project_endpoint(repository, &["repository", "tags", tag])?;
        let response = self.get(url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let tag: GitLabTag = check_status(response, &repository.slug())?
            .json()
            .await
            .map_err(|e| HostError::InvalidResponse(e.to_string()))?;
        Ok(tag.commit.and_then(|commit| commit.message))
    }
}

impl Default for GitLabHost {
    fn default() -> Self {
        Self::new()
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

#[async_trait::async_trait]
impl ReleaseHost for GitLabHost {
    fn host_kind(&self) -> HostKind {
        HostKind::GitLab
    }

    async fn fetch_tags(&self, repository: &RepositoryCoordinate) -> Result<Vec<Tag>, HostError> {
        let mut url = self.project_endpoint(repository, &["repository", "tags"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &TAGS_PER_PAGE.to_string());

        let response = check_status(self.get(url).await?, &repository.slug())?;
        let tags: Vec<GitLabTag> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitLab tags response: {}", e);
            HostError::InvalidResponse(e.to_string())
        })?;

        Ok(tags.into_iter().map(|tag| Tag::from_name(tag.name)).collect())
    }

    async fn fetch_note(
        &self,
        repository: &RepositoryCoordinate,
        tag: &str,
    ) -> Result<Option<String>, HostError> {
        if let Some(description) = non_blank(self.release_description(repository, tag).await?) {
            return Ok(Some(description));
        }

        debug!(
            "No release description for {}@{}, using tag commit message",
            repository.slug(),
            tag
        );
        Ok(non_blank(self.tag_commit_message(repository, tag).await?))
    }
}
