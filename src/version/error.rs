use thiserror::Error;

use crate::container::InspectError;

/// Failure of a single outbound registry call.
///
/// Never crosses the [`Registry`](crate::version::registry::Registry) trait:
/// implementations log it and degrade to `None`.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Repository not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Failure of a version resolution request.
///
/// Only container-engine failures surface here; registry failures degrade to
/// empty results instead.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Container not found: {0}")]
    NotFound(String),

    #[error("Container engine is not reachable: {0}")]
    EngineUnavailable(String),

    #[error("Failed to inspect container: {0}")]
    Unexpected(String),
}

impl From<InspectError> for ResolveError {
    fn from(err: InspectError) -> Self {
        match err {
            InspectError::NotFound(id) => ResolveError::NotFound(id),
            InspectError::Unavailable(msg) => ResolveError::EngineUnavailable(msg),
            InspectError::Other(msg) => ResolveError::Unexpected(msg),
        }
    }
}
