//! Registry test utilities
//!
//! A mockito server standing in for the three Docker Hub endpoints.

use mockito::{Matcher, Mock, Server, ServerGuard};

use porthole::config::{CacheConfig, RegistryConfig, RegistryUrls, TimeoutConfig};
use porthole::version::registries::DockerHubRegistry;

/// Fake Docker Hub backed by a mockito server
pub struct FakeDockerHub {
    pub server: ServerGuard,
}

impl FakeDockerHub {
    pub async fn start() -> Self {
        Self {
            server: Server::new_async().await,
        }
    }

    /// Registry configuration pointing every endpoint at this server
    pub fn config(&self) -> RegistryConfig {
        let base = self.server.url();
        RegistryConfig {
            urls: RegistryUrls {
                registry: format!("{}/v2/", base),
                auth: format!("{}/token?service=registry.docker.io&scope=repository:", base),
                repositories: format!("{}/repositories/", base),
            },
            timeout: TimeoutConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Serves the first page of tags for `repository`
    pub async fn mock_tags(&mut self, repository: &str, tags: &[&str]) -> Mock {
        self.tags_mock(repository, tags).create_async().await
    }

    /// Tag-listing mock, not yet registered (for setting hit expectations)
    pub fn tags_mock(&mut self, repository: &str, tags: &[&str]) -> Mock {
        let results: Vec<_> = tags
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect();

        self.server
            .mock("GET", format!("/repositories/{}/tags", repository).as_str())
            .match_query(Matcher::UrlEncoded("page_size".into(), "100".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "results": results }).to_string())
    }

    /// Issues `token` for pull access to `repository`
    pub async fn mock_token(&mut self, repository: &str, token: &str) -> Mock {
        self.token_mock(repository, token).create_async().await
    }

    /// Auth mock, not yet registered
    pub fn token_mock(&mut self, repository: &str, token: &str) -> Mock {
        self.server
            .mock("GET", "/token")
            .match_query(Matcher::UrlEncoded(
                "scope".into(),
                format!("repository:{}:pull", repository),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(serde_json::json!({ "token": token }).to_string())
    }

    /// Serves `digest` for the manifest of `repository:tag`
    pub async fn mock_digest(&mut self, repository: &str, tag: &str, digest: &str) -> Mock {
        self.server
            .mock(
                "HEAD",
                format!("/v2/{}/manifests/{}", repository, tag).as_str(),
            )
            .with_status(200)
            .with_header("Docker-Content-Digest", digest)
            .create_async()
            .await
    }
}

/// Create a Docker Hub registry client talking to the fake server
pub fn create_test_registry(hub: &FakeDockerHub) -> DockerHubRegistry {
    DockerHubRegistry::new(&hub.config()).unwrap()
}
