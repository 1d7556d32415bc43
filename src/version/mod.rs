//! Version resolution layer for container images
//!
//! This module determines which version a container runs, which version its
//! registry publishes, and whether the two differ.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│  Registry   │────▶│    Cache    │
//! │  (verdict)  │     │ (Docker Hub)│     │(ttl, single │
//! └─────────────┘     └─────────────┘     │   flight)   │
//!        │                   │            └─────────────┘
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │  Container  │     │ Image/Semver│
//! │ (inspector) │     │ (pure utils)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`image`]: Image reference decomposition (repository, tag, short name)
//! - [`semver`]: Release-tag detection and comparison
//! - [`cache`]: TTL/size-bounded caches with single-flight population
//! - [`registry`]: Registry trait for latest-version and digest lookups
//! - [`registries`]: Concrete registry implementations (Docker Hub)
//! - [`resolver`]: Per-container version resolution and update detection
//! - [`error`]: Error types for registry calls and resolution
//! - [`types`]: Common types like `VersionResult`

pub mod cache;
pub mod error;
pub mod image;
pub mod registries;
pub mod registry;
pub mod resolver;
pub mod semver;
pub mod types;
