//! Container inspector test utilities

use std::collections::HashMap;

use async_trait::async_trait;

use porthole::container::{ContainerDetails, ContainerInspector, InspectError};

/// In-memory inspector holding a fixed set of containers
#[derive(Default)]
pub struct MockInspector {
    containers: HashMap<String, ContainerDetails>,
    digests: HashMap<String, Vec<String>>,
}

impl MockInspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a container; its image id is derived from the container id
    pub fn with_container(
        mut self,
        container_id: &str,
        image: &str,
        env: Vec<&str>,
        labels: Vec<(&str, &str)>,
        repo_digests: Vec<&str>,
    ) -> Self {
        let image_id = format!("sha256:{}", container_id);
        self.containers.insert(
            container_id.to_string(),
            ContainerDetails {
                image: Some(image.to_string()),
                image_id: Some(image_id.clone()),
                env: env.into_iter().map(|s| s.to_string()).collect(),
                labels: labels
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        );
        self.digests.insert(
            image_id,
            repo_digests.into_iter().map(|s| s.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl ContainerInspector for MockInspector {
    async fn inspect_container(&self, container_id: &str) -> Result<ContainerDetails, InspectError> {
        self.containers
            .get(container_id)
            .cloned()
            .ok_or_else(|| InspectError::NotFound(container_id.to_string()))
    }

    async fn repo_digests(&self, image_id: &str) -> Result<Vec<String>, InspectError> {
        self.digests
            .get(image_id)
            .cloned()
            .ok_or_else(|| InspectError::NotFound(image_id.to_string()))
    }
}
