//! Domain service for cache-aside resource fetching.
//!
//! Handlers and CLI commands talk to [`ResourceService`]; they never touch the
//! store or the providers directly.

use thiserror::Error;

use crate::db::PersistReport;
use crate::domain::{CacheStatus, Coordinates, ResourceKind};
use crate::models::{CachedResource, Location};
use crate::normalize::NormalizeError;

/// Errors surfaced by the fetch service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The provider answered but had nothing usable. Nothing was cached.
    #[error("No {resource} data available")]
    UpstreamEmpty { resource: &'static str },

    /// The provider could not be reached or returned an error status.
    #[error("{service} request failed: {message}")]
    UpstreamTransport { service: String, message: String },

    #[error("Location {0} not found")]
    LocationNotFound(i32),

    #[error("Database read failed: {0}")]
    Read(String),

    #[error("Database write failed: {0}")]
    Write(String),
}

impl FetchError {
    pub fn transport(service: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::UpstreamTransport {
            service: service.into(),
            message: format!("{err:#}"),
        }
    }

    pub fn read(err: &anyhow::Error) -> Self {
        Self::Read(format!("{err:#}"))
    }

    pub fn write(err: &anyhow::Error) -> Self {
        Self::Write(format!("{err:#}"))
    }

    /// Short machine-readable label, used for metrics and error bodies.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::UpstreamEmpty { .. } => "upstream_empty",
            Self::UpstreamTransport { .. } => "upstream_transport",
            Self::LocationNotFound(_) => "location_not_found",
            Self::Read(_) => "read",
            Self::Write(_) => "write",
        }
    }
}

impl From<NormalizeError> for FetchError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::Empty(resource) => Self::UpstreamEmpty { resource },
        }
    }
}

/// Identifies the location a resource request is for.
///
/// Coordinates and search text are optional; when absent, the stored
/// location's values are used.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTarget {
    pub location_id: i32,
    pub coordinates: Option<Coordinates>,
    pub search_query: Option<String>,
}

impl ResourceTarget {
    #[must_use]
    pub const fn location(location_id: i32) -> Self {
        Self {
            location_id,
            coordinates: None,
            search_query: None,
        }
    }
}

/// Records returned for one resource request.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: CacheStatus,
    pub records: Vec<CachedResource>,
    /// Present on the refresh path only.
    pub persisted: Option<PersistReport>,
}

/// Domain service trait for cache-aside fetching.
#[async_trait::async_trait]
pub trait ResourceService: Send + Sync {
    /// Returns the stored location for `query`, geocoding and storing it on
    /// first use.
    ///
    /// # Errors
    ///
    /// - [`FetchError::UpstreamEmpty`] if the geocoder found nothing
    /// - [`FetchError::UpstreamTransport`] if the geocoder failed
    /// - [`FetchError::Read`] / [`FetchError::Write`] on database failures
    async fn resolve_location(&self, query: &str) -> Result<Location, FetchError>;

    /// Returns cached rows for `kind` when fresh, otherwise purges them and
    /// refreshes from the provider.
    ///
    /// # Errors
    ///
    /// - [`FetchError::LocationNotFound`] if the target location does not exist
    /// - [`FetchError::UpstreamEmpty`] / [`FetchError::UpstreamTransport`] on
    ///   provider problems; the cache is left purged in that case
    /// - [`FetchError::Read`] / [`FetchError::Write`] on database failures
    async fn fetch(&self, kind: ResourceKind, target: &ResourceTarget)
    -> Result<Fetched, FetchError>;

    /// Drops every cached row for `kind` at `location_id`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Write`] if the delete fails.
    async fn invalidate(&self, kind: ResourceKind, location_id: i32) -> Result<u64, FetchError>;
}
