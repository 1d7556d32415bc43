use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

// =============================================================================
// Registry endpoints
// =============================================================================

/// Default manifest endpoint prefix (Docker Hub registry API v2)
pub const DEFAULT_REGISTRY_URL: &str = "https://registry-1.docker.io/v2/";

/// Default auth endpoint prefix; the repository path and `:pull` are appended
pub const DEFAULT_AUTH_URL: &str =
    "https://auth.docker.io/token?service=registry.docker.io&scope=repository:";

/// Default tag-listing endpoint prefix (Docker Hub repositories API)
pub const DEFAULT_REPOSITORIES_URL: &str = "https://hub.docker.com/v2/repositories/";

// =============================================================================
// Time-related constants
// =============================================================================

/// Default lifetime of a cached latest-version lookup in milliseconds (1 hour)
pub const DEFAULT_VERSION_TTL_MS: u64 = 60 * 60 * 1000;

/// Default upper bound on cached latest-version lookups
pub const DEFAULT_VERSION_MAX_SIZE: u64 = 500;

/// Lifetime of a cached bearer token. Registry tokens expire after 5 minutes.
pub const TOKEN_TTL: Duration = Duration::from_secs(4 * 60);

/// Upper bound on cached bearer tokens (one auth host, few repositories in flight)
pub const TOKEN_MAX_SIZE: u64 = 16;

/// Default connect timeout for registry calls in milliseconds
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;

/// Default read timeout for registry calls in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PortholeConfig {
    pub registry: RegistryConfig,
    pub docker: DockerConfig,
    pub log: LogConfig,
}

impl PortholeConfig {
    /// Loads configuration from a JSON file, or returns defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Invalid config file {:?}", path))
    }
}

/// Registry-related configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegistryConfig {
    pub urls: RegistryUrls,
    pub timeout: TimeoutConfig,
    pub cache: CacheConfig,
}

/// Endpoint prefixes used to build registry requests
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistryUrls {
    pub registry: String,
    pub auth: String,
    pub repositories: String,
}

impl Default for RegistryUrls {
    fn default() -> Self {
        Self {
            registry: DEFAULT_REGISTRY_URL.to_string(),
            auth: DEFAULT_AUTH_URL.to_string(),
            repositories: DEFAULT_REPOSITORIES_URL.to_string(),
        }
    }
}

/// HTTP client timeouts in milliseconds
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeoutConfig {
    pub connect_ms: u64,
    pub read_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

/// Version cache configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Time-to-live of a latest-version lookup in milliseconds
    pub ttl_ms: u64,
    /// Maximum number of cached image references
    pub version_max_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_VERSION_TTL_MS,
            version_max_size: DEFAULT_VERSION_MAX_SIZE,
        }
    }
}

/// Container engine connection
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct DockerConfig {
    /// Engine address (`unix:///var/run/docker.sock`, `tcp://host:2375`).
    /// `None` uses the engine's local defaults.
    pub host: Option<String>,
}

/// Log output configuration
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Write to a daily-rotated file under the data directory instead of stderr
    pub file: bool,
}

/// Returns the path to the data directory for porthole.
/// Uses $XDG_DATA_HOME/porthole if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/porthole,
/// or ./porthole if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the directory log files are written to.
pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("porthole")
}
