//! Docker Hub registry implementation
//!
//! Three endpoints are involved:
//! - the Hub repositories API lists tags (`{"results": [{"name": ...}]}`)
//! - the auth service issues pull-scope bearer tokens (`{"token": ...}`)
//! - the registry v2 API serves manifests; a HEAD request reports the digest in
//!   the `Docker-Content-Digest` header

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{RegistryConfig, RegistryUrls, TOKEN_MAX_SIZE, TOKEN_TTL};
use crate::version::cache::{TokenCache, VersionCache};
use crate::version::error::RegistryError;
use crate::version::image::resolve_repository;
use crate::version::registry::Registry;
use crate::version::semver::find_semantic_max;

/// Media type requested for manifest lookups
pub const MANIFEST_V2_MEDIA_TYPE: &str = "application/vnd.docker.distribution.manifest.v2+json";

/// Response header carrying the manifest digest
pub const DOCKER_CONTENT_DIGEST: &str = "Docker-Content-Digest";

/// Only the first page of the tag listing is ever read
const TAG_PAGE_SIZE: u32 = 100;

/// Response from the tag-listing API
#[derive(Debug, Deserialize)]
struct TagListResponse {
    results: Option<Vec<TagEntry>>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Response from the auth service
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

/// Registry implementation for Docker Hub
pub struct DockerHubRegistry {
    client: reqwest::Client,
    urls: RegistryUrls,
    versions: VersionCache,
    tokens: TokenCache,
}

impl DockerHubRegistry {
    /// Creates a DockerHubRegistry from the registry configuration
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("porthole/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_millis(config.timeout.connect_ms))
            .read_timeout(Duration::from_millis(config.timeout.read_ms))
            .build()?;

        Ok(Self {
            client,
            urls: config.urls.clone(),
            versions: VersionCache::new(
                "version",
                Duration::from_millis(config.cache.ttl_ms),
                config.cache.version_max_size,
            ),
            tokens: TokenCache::new("token", TOKEN_TTL, TOKEN_MAX_SIZE),
        })
    }

    /// The latest-version cache, keyed by image reference
    #[cfg(test)]
    pub(crate) fn version_cache(&self) -> &VersionCache {
        &self.versions
    }

    /// Replaces the token cache with one using a shorter TTL
    #[cfg(test)]
    fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.tokens = TokenCache::new("token", ttl, TOKEN_MAX_SIZE);
        self
    }

    /// The bearer-token cache, keyed by repository
    #[cfg(test)]
    pub(crate) fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    /// Fetches the first page of tags and picks the highest release tag
    async fn fetch_latest_version(&self, repository: &str) -> Result<Option<String>, RegistryError> {
        let url = format!(
            "{}{}/tags?page_size={}",
            self.urls.repositories, repository, TAG_PAGE_SIZE
        );

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, repository, &url)?;

        let listing: TagListResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse tag listing for {}: {}", repository, e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        let Some(results) = listing.results else {
            return Err(RegistryError::InvalidResponse(
                "tag listing has no results".to_string(),
            ));
        };

        Ok(find_semantic_max(results.into_iter().map(|t| t.name)))
    }

    /// Exchanges the repository path for a pull-scope bearer token
    async fn fetch_token(&self, repository: &str) -> Result<Option<String>, RegistryError> {
        let url = format!("{}{}:pull", self.urls.auth, repository);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, repository, &url)?;

        let body: TokenResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse auth response for {}: {}", repository, e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(body.token)
    }

    /// Returns the cached token for the repository, fetching it on a miss.
    /// A failed or empty exchange is cached as `None`.
    async fn auth_token(&self, repository: &str) -> Option<String> {
        self.tokens
            .get_or_fetch(repository, async {
                self.fetch_token(repository)
                    .await
                    .inspect_err(|e| warn!("Could not fetch auth token for {}: {}", repository, e))
                    .ok()
                    .flatten()
            })
            .await
    }

    /// HEADs the manifest and reads the digest header
    async fn fetch_digest(
        &self,
        repository: &str,
        tag: &str,
        token: &str,
    ) -> Result<String, RegistryError> {
        let url = format!("{}{}/manifests/{}", self.urls.registry, repository, tag);

        let response = self
            .client
            .head(&url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(ACCEPT, MANIFEST_V2_MEDIA_TYPE)
            .send()
            .await?;
        let response = check_status(response, repository, &url)?;

        response
            .headers()
            .get(DOCKER_CONTENT_DIGEST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                RegistryError::InvalidResponse(format!("missing {} header", DOCKER_CONTENT_DIGEST))
            })
    }
}

/// Maps non-success statuses to registry errors
fn check_status(
    response: reqwest::Response,
    repository: &str,
    url: &str,
) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(RegistryError::NotFound(repository.to_string()));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        return Err(RegistryError::RateLimited {
            retry_after_secs: retry_after,
        });
    }

    if !status.is_success() {
        warn!("Registry returned status {}: {}", status, url);
        return Err(RegistryError::InvalidResponse(format!(
            "Unexpected status: {}",
            status
        )));
    }

    Ok(response)
}

#[async_trait::async_trait]
impl Registry for DockerHubRegistry {
    async fn latest_version(&self, image: &str) -> Option<String> {
        // a listing without release tags is cached, a failed request is not
        self.versions
            .try_get_or_fetch(image, async {
                self.fetch_latest_version(&resolve_repository(image)).await
            })
            .await
            .inspect_err(|e| warn!("Could not fetch tags for {}: {}", image, e))
            .ok()
            .flatten()
    }

    async fn digest(&self, image: &str, tag: &str) -> Option<String> {
        let repository = resolve_repository(image);
        let token = self.auth_token(&repository).await?;

        self.fetch_digest(&repository, tag, &token)
            .await
            .inspect_err(|e| debug!("Could not fetch digest for {}:{} - {}", image, tag, e))
            .ok()
    }
}
