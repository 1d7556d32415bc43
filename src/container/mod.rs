//! Container engine inspection
//!
//! The version resolver only needs a narrow view of a container: the image it
//! was started from, its environment and labels, and the repo digests the engine
//! recorded for that image. [`ContainerInspector`] is that view;
//! [`DockerInspector`] provides it over the Docker Engine API.
//!
//! [`ContainerCatalog`] covers the dashboard side: listing containers with
//! their public ports and checking that the engine answers at all.

pub mod docker;
pub mod mapper;
pub mod service;

use std::collections::{BTreeSet, HashMap};

#[cfg(test)]
use mockall::automock;
use serde::Serialize;
use thiserror::Error;

pub use docker::DockerInspector;

/// Runtime metadata of a single container
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerDetails {
    /// Image reference the container was created from (e.g., "nginx:1.25")
    pub image: Option<String>,
    /// Engine-local image id (`sha256:...`) backing the container
    pub image_id: Option<String>,
    /// Environment as `KEY=VALUE` entries
    pub env: Vec<String>,
    pub labels: HashMap<String, String>,
}

/// One row of the container listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerInfo {
    pub id: String,
    /// Primary container name without the engine's leading `/`
    pub name: String,
    /// Name with the compose project prefix removed
    pub display_name: String,
    pub image: Option<String>,
    /// Host ports published by the container
    pub exposed_ports: BTreeSet<u16>,
    /// Compose project the container belongs to
    pub project: Option<String>,
    pub state: Option<String>,
    pub status: Option<String>,
    pub has_public_ports: bool,
}

#[derive(Debug, Error)]
pub enum InspectError {
    #[error("Container not found: {0}")]
    NotFound(String),

    #[error("Container engine unavailable: {0}")]
    Unavailable(String),

    #[error("Container engine error: {0}")]
    Other(String),
}

/// Trait for reading container and image metadata from a container engine
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ContainerInspector: Send + Sync {
    /// Inspects a container by id or name
    ///
    /// # Returns
    /// * `Ok(ContainerDetails)` - The container's image, env and labels
    /// * `Err(InspectError::NotFound)` - No such container
    async fn inspect_container(&self, container_id: &str) -> Result<ContainerDetails, InspectError>;

    /// Repo digests (`repo@sha256:...`) recorded locally for an image.
    /// Empty for images that were built locally rather than pulled.
    async fn repo_digests(&self, image_id: &str) -> Result<Vec<String>, InspectError>;
}

/// Trait for listing containers and checking engine reachability
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ContainerCatalog: Send + Sync {
    /// Lists containers; stopped ones only when `include_stopped` is set
    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<ContainerInfo>, InspectError>;

    /// Succeeds when the engine answers a ping
    async fn ping(&self) -> Result<(), InspectError>;
}
