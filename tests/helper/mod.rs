#![allow(dead_code)]

pub mod container;
pub mod registry;

pub use container::MockInspector;
pub use registry::{FakeDockerHub, create_test_registry};
