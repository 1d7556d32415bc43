//! Per-container version resolution
//!
//! Determines a container's current version from its environment, labels and
//! image tag, looks up the newest published release, and decides whether an
//! update is available:
//!
//! 1. If the registry serves a manifest digest for the container's tag, the
//!    update check is digest-exact: an update exists iff none of the local repo
//!    digests contains the remote digest. This catches rolling tags (`latest`,
//!    `alpine`) whose content moved without the tag changing.
//! 2. Otherwise, for release-shaped tags only, the current version is compared
//!    against the newest published release tag.
//!
//! Images without local repo digests were never pulled from a registry and are
//! not compared at all.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error};

use crate::container::{ContainerDetails, ContainerInspector};
use crate::version::error::ResolveError;
use crate::version::image::{extract_name, extract_tag};
use crate::version::registry::Registry;
use crate::version::semver::is_semver;
use crate::version::types::VersionResult;

/// Generic version environment variable, checked after the image-specific one
const VERSION_ENV: &str = "VERSION";

/// OCI standard version label
pub const LABEL_OCI_IMAGE_VERSION: &str = "org.opencontainers.image.version";

/// Legacy version label
pub const LABEL_IMAGE_VERSION: &str = "version";

/// Resolves version information for containers.
///
/// Holds no per-request state; caching lives in the registry.
pub struct VersionResolver {
    inspector: Arc<dyn ContainerInspector>,
    registry: Arc<dyn Registry>,
}

impl VersionResolver {
    pub fn new(inspector: Arc<dyn ContainerInspector>, registry: Arc<dyn Registry>) -> Self {
        Self {
            inspector,
            registry,
        }
    }

    /// Resolve current version, latest version and update availability.
    ///
    /// Only container-engine failures are returned as errors. Registry failures
    /// degrade to `latest_version: None` and `update_available: false`.
    pub async fn resolve(&self, container_id: &str) -> Result<VersionResult, ResolveError> {
        let details = self.inspector.inspect_container(container_id).await?;

        let Some(image) = details.image.as_deref().filter(|image| !image.is_empty()) else {
            debug!("Container {} has no image configured", container_id);
            return Ok(VersionResult::unknown());
        };

        let current_version = current_version(image, &details.env, &details.labels);

        let repo_digests = self.local_repo_digests(&details).await;
        if repo_digests.is_empty() {
            debug!("Image {} has no repo digests, treating as local build", image);
            return Ok(VersionResult::new(Some(current_version), None, false));
        }

        let latest_version = self.registry.latest_version(image).await;
        let update_available = self
            .check_for_update(
                image,
                &current_version,
                latest_version.as_deref(),
                &repo_digests,
            )
            .await;

        Ok(VersionResult::new(
            Some(current_version),
            latest_version,
            update_available,
        ))
    }

    /// Repo digests of the container's image; a failed lookup counts as none.
    async fn local_repo_digests(&self, details: &ContainerDetails) -> Vec<String> {
        let Some(image_id) = details.image_id.as_deref() else {
            return Vec::new();
        };

        self.inspector
            .repo_digests(image_id)
            .await
            .inspect_err(|e| error!("Failed to inspect image {}: {}", image_id, e))
            .unwrap_or_default()
    }

    async fn check_for_update(
        &self,
        image: &str,
        current_version: &str,
        latest_version: Option<&str>,
        repo_digests: &[String],
    ) -> bool {
        let tag = extract_tag(image);

        match self.registry.digest(image, tag).await {
            Some(remote_digest) => {
                let matched = digest_matches(&remote_digest, repo_digests);
                debug!(
                    "Remote digest for {} is {} (local match: {})",
                    image, remote_digest, matched
                );
                !matched
            }
            None => semver_update_available(tag, current_version, latest_version),
        }
    }
}

/// Determine the current version of a container.
///
/// Sources in order, first non-empty value wins:
/// 1. `<IMAGE_NAME>_VERSION` env var (image short name uppercased, non-alphanumerics as `_`)
/// 2. `VERSION` env var
/// 3. `org.opencontainers.image.version` label
/// 4. `version` label
/// 5. the image tag (`latest` when absent)
pub fn current_version(image: &str, env: &[String], labels: &HashMap<String, String>) -> String {
    let image_env = version_env_name(extract_name(image));

    env_value(env, &image_env)
        .or_else(|| env_value(env, VERSION_ENV))
        .or_else(|| label_value(labels, LABEL_OCI_IMAGE_VERSION))
        .or_else(|| label_value(labels, LABEL_IMAGE_VERSION))
        .unwrap_or_else(|| extract_tag(image))
        .to_string()
}

/// "app-server" -> "APP_SERVER_VERSION"
fn version_env_name(image_name: &str) -> String {
    let prefix: String = image_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}_{}", prefix, VERSION_ENV)
}

fn env_value<'a>(env: &'a [String], key: &str) -> Option<&'a str> {
    env.iter()
        .filter_map(|entry| entry.split_once('='))
        .find(|(k, v)| *k == key && !v.is_empty())
        .map(|(_, v)| v)
}

fn label_value<'a>(labels: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    labels
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Whether any local repo digest (`repo@sha256:...`) contains the remote digest.
///
/// Substring containment, not equality: a truncated remote digest would match
/// too. Kept as-is because stricter matching changes which images report updates.
pub fn digest_matches(remote_digest: &str, repo_digests: &[String]) -> bool {
    repo_digests.iter().any(|rd| rd.contains(remote_digest))
}

/// Fallback when no remote digest is available: only release-shaped tags are
/// compared, and only by string inequality against the latest release.
fn semver_update_available(tag: &str, current_version: &str, latest_version: Option<&str>) -> bool {
    is_semver(tag) && latest_version.is_some_and(|latest| latest != current_version)
}
