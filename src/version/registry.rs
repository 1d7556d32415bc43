//! Registry trait for looking up published image versions and manifest digests

#[cfg(test)]
use mockall::automock;

/// Read-only view of a remote image registry.
///
/// Both lookups are advisory: any network, auth or parse failure is absorbed by
/// the implementation and reported as `None`, never as an error.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Highest release tag published for the image's repository
    ///
    /// # Arguments
    /// * `image` - Full image reference (e.g., "nginx:1.25", "bitnami/redis:7")
    ///
    /// # Returns
    /// * `Some(tag)` - The highest tag that is a release version
    /// * `None` - No release tag exists, or the lookup failed
    async fn latest_version(&self, image: &str) -> Option<String>;

    /// Manifest digest the registry currently serves for `tag`
    ///
    /// # Returns
    /// * `Some(digest)` - The `sha256:...` content digest, verbatim
    /// * `None` - No token, HTTP error, or no digest header
    async fn digest(&self, image: &str, tag: &str) -> Option<String>;
}
