//! Docker Engine API implementation of [`ContainerInspector`]

use bollard::container::{InspectContainerOptions, ListContainersOptions};
use bollard::errors::Error as DockerError;
use bollard::{API_DEFAULT_VERSION, Docker};
use tracing::{debug, info};

use crate::config::DockerConfig;
use crate::container::mapper::to_container_info;
use crate::container::{
    ContainerCatalog, ContainerDetails, ContainerInfo, ContainerInspector, InspectError,
};

/// Request timeout for engine calls in seconds
const ENGINE_TIMEOUT_SECS: u64 = 30;

pub struct DockerInspector {
    docker: Docker,
}

impl DockerInspector {
    /// Connects to the engine named in the configuration, or to the local
    /// default socket when none is configured.
    pub fn connect(config: &DockerConfig) -> Result<Self, InspectError> {
        let docker = match config.host.as_deref() {
            None => Docker::connect_with_local_defaults(),
            Some(host) if host.starts_with("unix://") => {
                Docker::connect_with_socket(host, ENGINE_TIMEOUT_SECS, API_DEFAULT_VERSION)
            }
            Some(host) => Docker::connect_with_http(host, ENGINE_TIMEOUT_SECS, API_DEFAULT_VERSION),
        }
        .map_err(|e| InspectError::Unavailable(e.to_string()))?;

        info!(
            "Using container engine at {}",
            config.host.as_deref().unwrap_or("local defaults")
        );
        Ok(Self { docker })
    }
}

/// Engine 404s are "not found"; other API errors are unexpected; anything that
/// failed before the engine answered means the engine is unavailable.
fn map_docker_error(id: &str, err: DockerError) -> InspectError {
    match err {
        DockerError::DockerResponseServerError {
            status_code: 404, ..
        } => InspectError::NotFound(id.to_string()),
        DockerError::DockerResponseServerError {
            status_code,
            message,
        } => InspectError::Other(format!("status {}: {}", status_code, message)),
        other => InspectError::Unavailable(other.to_string()),
    }
}

#[async_trait::async_trait]
impl ContainerInspector for DockerInspector {
    async fn inspect_container(&self, container_id: &str) -> Result<ContainerDetails, InspectError> {
        let response = self
            .docker
            .inspect_container(container_id, None::<InspectContainerOptions>)
            .await
            .map_err(|e| map_docker_error(container_id, e))?;

        let config = response.config.unwrap_or_default();
        debug!(
            "Inspected container {} (image {:?})",
            container_id, config.image
        );

        Ok(ContainerDetails {
            image: config.image,
            image_id: response.image,
            env: config.env.unwrap_or_default(),
            labels: config.labels.unwrap_or_default(),
        })
    }

    async fn repo_digests(&self, image_id: &str) -> Result<Vec<String>, InspectError> {
        let image = self
            .docker
            .inspect_image(image_id)
            .await
            .map_err(|e| map_docker_error(image_id, e))?;

        Ok(image.repo_digests.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl ContainerCatalog for DockerInspector {
    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<ContainerInfo>, InspectError> {
        let options = ListContainersOptions::<String> {
            all: include_stopped,
            ..Default::default()
        };

        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|e| map_docker_error("containers", e))?;

        Ok(summaries.into_iter().map(to_container_info).collect())
    }

    async fn ping(&self) -> Result<(), InspectError> {
        self.docker
            .ping()
            .await
            .map_err(|e| map_docker_error("ping", e))?;
        Ok(())
    }
}
