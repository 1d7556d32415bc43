//! Registry implementations for looking up image versions

pub mod docker_hub;

pub use docker_hub::DockerHubRegistry;
