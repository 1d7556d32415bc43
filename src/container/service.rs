//! Container listing and engine health

use serde::Serialize;
use tracing::{debug, warn};

use crate::container::{ContainerCatalog, ContainerInfo, InspectError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    Up,
    Down,
}

/// Engine reachability as reported by `porthole health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HealthReport {
    pub fn up() -> Self {
        Self {
            status: HealthStatus::Up,
            detail: None,
        }
    }

    pub fn down(detail: String) -> Self {
        Self {
            status: HealthStatus::Down,
            detail: Some(detail),
        }
    }
}

/// Lists containers for the dashboard.
///
/// Containers without a published host port are dropped unless
/// `include_without_ports` is set; stopped containers are only asked for when
/// `include_stopped` is set.
pub async fn list_containers(
    catalog: &dyn ContainerCatalog,
    include_without_ports: bool,
    include_stopped: bool,
) -> Result<Vec<ContainerInfo>, InspectError> {
    let containers = catalog.list_containers(include_stopped).await?;
    debug!("Engine listed {} containers", containers.len());

    Ok(containers
        .into_iter()
        .filter(|container| include_without_ports || container.has_public_ports)
        .collect())
}

/// Pings the engine. Never fails; an unreachable engine is reported as down.
pub async fn check_health(catalog: &dyn ContainerCatalog) -> HealthReport {
    match catalog.ping().await {
        Ok(()) => HealthReport::up(),
        Err(InspectError::Unavailable(reason)) => {
            warn!("Container engine unreachable: {}", reason);
            HealthReport::down(format!("Error connecting to docker: {}", reason))
        }
        Err(e) => {
            warn!("Container engine ping failed: {}", e);
            HealthReport::down(format!("Unexpected exception: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::MockContainerCatalog;
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::json;
    use std::collections::BTreeSet;

    fn container(name: &str, ports: &[u16]) -> ContainerInfo {
        ContainerInfo {
            id: format!("id-{}", name),
            name: name.to_string(),
            display_name: name.to_string(),
            image: Some("nginx:1.25".to_string()),
            exposed_ports: ports.iter().copied().collect::<BTreeSet<_>>(),
            project: None,
            state: Some("running".to_string()),
            status: None,
            has_public_ports: !ports.is_empty(),
        }
    }

    #[rstest]
    #[case::published_only(false, vec!["web"])]
    #[case::include_without_ports(true, vec!["web", "worker"])]
    #[tokio::test]
    async fn list_containers_filters_by_public_ports(
        #[case] include_without_ports: bool,
        #[case] expected: Vec<&str>,
    ) {
        let mut catalog = MockContainerCatalog::new();
        catalog
            .expect_list_containers()
            .with(eq(false))
            .times(1)
            .returning(|_| Ok(vec![container("web", &[8080]), container("worker", &[])]));

        let names: Vec<String> = list_containers(&catalog, include_without_ports, false)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, expected);
    }

    #[tokio::test]
    async fn list_containers_asks_engine_for_stopped_containers() {
        let mut catalog = MockContainerCatalog::new();
        catalog
            .expect_list_containers()
            .with(eq(true))
            .times(1)
            .returning(|_| Ok(vec![]));

        assert!(list_containers(&catalog, false, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_containers_propagates_engine_errors() {
        let mut catalog = MockContainerCatalog::new();
        catalog
            .expect_list_containers()
            .returning(|_| Err(InspectError::Unavailable("connection refused".to_string())));

        assert!(matches!(
            list_containers(&catalog, true, true).await,
            Err(InspectError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn check_health_reports_up_when_engine_answers() {
        let mut catalog = MockContainerCatalog::new();
        catalog.expect_ping().returning(|| Ok(()));

        let report = check_health(&catalog).await;

        assert_eq!(report, HealthReport::up());
        assert_eq!(serde_json::to_value(&report).unwrap(), json!({ "status": "UP" }));
    }

    #[rstest]
    #[case::unreachable(
        InspectError::Unavailable("connection refused".to_string()),
        "Error connecting to docker: connection refused"
    )]
    #[case::unexpected(
        InspectError::Other("status 500: boom".to_string()),
        "Unexpected exception: Container engine error: status 500: boom"
    )]
    #[tokio::test]
    async fn check_health_reports_down_on_ping_failure(
        #[case] error: InspectError,
        #[case] expected_detail: &str,
    ) {
        let mut catalog = MockContainerCatalog::new();
        let mut error = Some(error);
        catalog
            .expect_ping()
            .returning(move || Err(error.take().expect("ping called once")));

        let report = check_health(&catalog).await;

        assert_eq!(report, HealthReport::down(expected_detail.to_string()));
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({ "status": "DOWN", "detail": expected_detail })
        );
    }
}
