//! Maps engine container summaries to listing rows

use std::collections::{BTreeSet, HashMap};

use bollard::models::{ContainerSummary, Port};

use crate::container::ContainerInfo;

/// Label set by docker compose on every container of a project
pub const LABEL_COMPOSE_PROJECT: &str = "com.docker.compose.project";

/// Name used when the engine reports none
const UNKNOWN_NAME: &str = "Unknown";

pub fn to_container_info(summary: ContainerSummary) -> ContainerInfo {
    let name = container_name(summary.names.as_deref());
    let project = compose_project(summary.labels.as_ref());
    let exposed_ports = public_ports(summary.ports.as_deref());
    let display_name = display_name(&name, project.as_deref());

    ContainerInfo {
        id: summary.id.unwrap_or_default(),
        display_name,
        name,
        image: summary.image,
        has_public_ports: !exposed_ports.is_empty(),
        exposed_ports,
        project,
        state: summary.state,
        status: summary.status,
    }
}

/// First engine name with its leading `/` removed
fn container_name(names: Option<&[String]>) -> String {
    names
        .and_then(|names| names.first())
        .map(|name| name.strip_prefix('/').unwrap_or(name).to_string())
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

fn compose_project(labels: Option<&HashMap<String, String>>) -> Option<String> {
    labels?.get(LABEL_COMPOSE_PROJECT).cloned()
}

/// Only ports bound on the host count; container-internal ports are skipped.
fn public_ports(ports: Option<&[Port]>) -> BTreeSet<u16> {
    ports
        .unwrap_or_default()
        .iter()
        .filter_map(|port| port.public_port)
        .collect()
}

/// Compose names containers `<project>-<service>-<n>`; the prefix is noise in a listing.
fn display_name(name: &str, project: Option<&str>) -> String {
    project
        .and_then(|project| name.strip_prefix(project))
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(name)
        .to_string()
}
