//! Release host implementations for fetching tags and notes

pub mod github;
pub mod gitlab;

pub use github::GitHubHost;
pub use gitlab::GitLabHost;

use reqwest::{Response, StatusCode, Url};
use tracing::warn;

use crate::release::error::HostError;

/// Build an API endpoint by appending percent-encoded path segments to a base URL
fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, HostError> {
    let mut url =
        Url::parse(base_url).map_err(|e| HostError::InvalidUrl(format!("{base_url}: {e}")))?;
    url.path_segments_mut()
        .map_err(|_| HostError::InvalidUrl(base_url.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Map error statuses of a listing request to `HostError`
fn check_status(response: Response, repository: &str) -> Result<Response, HostError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(HostError::NotFound(repository.to_string()));
    }

    let quota_exhausted = status == StatusCode::FORBIDDEN
        && header_value(&response, "x-ratelimit-remaining").as_deref() == Some("0");
    if status == StatusCode::TOO_MANY_REQUESTS || quota_exhausted {
        return Err(HostError::RateLimited {
            retry_after_secs: header_value(&response, "retry-after").and_then(|v| v.parse().ok()),
        });
    }

    if !status.is_success() {
        warn!("{} returned status {}", response.url(), status);
        return Err(HostError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

fn header_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_encodes_each_segment() {
        let url = endpoint(
            "https://gitlab.gnome.org/",
            &["api", "v4", "projects", "GNOME/glib", "releases", "2.80.0"],
        )
        .unwrap();

        assert_eq!(
            url.as_str(),
            "https://gitlab.gnome.org/api/v4/projects/GNOME%2Fglib/releases/2.80.0"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let url = endpoint("https://ghe.example.com/api/v3", &["repos", "acme", "baz"]).unwrap();

        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/repos/acme/baz");
    }

    #[test]
    fn endpoint_rejects_invalid_base() {
        assert!(matches!(
            endpoint("not a url", &["repos"]),
            Err(HostError::InvalidUrl(_))
        ));
    }
}
