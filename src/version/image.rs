//! Image reference decomposition
//!
//! An image reference such as `registry.example.com:5000/org/app:1.2.3` is split
//! into a repository path (as Docker Hub addresses it), a tag, and a short name.
//! All functions are pure and total over arbitrary strings.

/// Tag assumed when a reference carries none
pub const DEFAULT_TAG: &str = "latest";

/// Namespace Docker Hub uses for unnamespaced official images
const OFFICIAL_NAMESPACE: &str = "library/";

/// Byte index of the tag separator: the last `:` after the last `/`.
fn tag_separator(image: &str) -> Option<usize> {
    let colon = image.rfind(':')?;
    match image.rfind('/') {
        Some(slash) if slash > colon => None,
        _ => Some(colon),
    }
}

/// Extracts the tag from an image reference, defaulting to `latest`.
///
/// A colon before the last `/` belongs to a registry host port, not a tag.
///
/// Examples:
/// - "nginx:1.25" -> "1.25"
/// - "redis" -> "latest"
/// - "host:5000/nginx" -> "latest"
pub fn extract_tag(image: &str) -> &str {
    match tag_separator(image) {
        Some(idx) => &image[idx + 1..],
        None => DEFAULT_TAG,
    }
}

/// Extracts the final path segment without registry, namespace or tag.
///
/// Examples:
/// - "my-reg/nginx:latest" -> "nginx"
/// - "postgres:15" -> "postgres"
pub fn extract_name(image: &str) -> &str {
    let segment = image.rsplit('/').next().unwrap_or(image);
    match segment.find(':') {
        Some(idx) => &segment[..idx],
        None => segment,
    }
}

/// Resolves the repository path used by the registry and tag-listing APIs.
///
/// The tag and any leading registry host are stripped. A first segment counts as
/// a host when it contains `.` or `:`, or is `localhost`. Single-segment names get
/// the `library/` prefix.
///
/// Examples:
/// - "redis" -> "library/redis"
/// - "bitnami/redis:7" -> "bitnami/redis"
/// - "ghcr.io/org/app:1.0" -> "org/app"
pub fn resolve_repository(image: &str) -> String {
    let untagged = match tag_separator(image) {
        Some(idx) => &image[..idx],
        None => image,
    };

    let path = match untagged.split_once('/') {
        Some((prefix, rest)) if is_registry_host(prefix) => rest,
        _ => untagged,
    };

    if path.contains('/') {
        path.to_string()
    } else {
        format!("{OFFICIAL_NAMESPACE}{path}")
    }
}

fn is_registry_host(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}
