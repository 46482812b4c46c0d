use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::clients::Upstream;
use crate::clients::geocode::GeocodeResponse;
use crate::db::Store;
use crate::domain::{CacheStatus, ResourceKind};
use crate::freshness;
use crate::models::{CachedResource, Location, ResourceData};
use crate::normalize;
use crate::services::resource_service::{FetchError, Fetched, ResourceService, ResourceTarget};

const GEOCODER: &str = "Google Geocoding";

/// [`ResourceService`] backed by the SQL store and the upstream providers.
///
/// The purge → fetch → insert sequence on the refresh path is not
/// transactional. Two concurrent requests for the same stale partition may
/// both refetch, and a reader between purge and insert sees no rows.
pub struct SeaOrmResourceService {
    store: Store,
    upstream: Arc<dyn Upstream>,
}

impl SeaOrmResourceService {
    #[must_use]
    pub fn new(store: Store, upstream: Arc<dyn Upstream>) -> Self {
        Self { store, upstream }
    }

    fn record_outcome(kind: &'static str, outcome: &'static str) {
        metrics::counter!("cache_requests_total", "kind" => kind, "outcome" => outcome)
            .increment(1);
    }

    /// Calls the provider for `kind` and normalizes its payload.
    async fn fetch_upstream(
        &self,
        kind: ResourceKind,
        location: &Location,
        target: &ResourceTarget,
    ) -> Result<Vec<ResourceData>, FetchError> {
        let at = target.coordinates.unwrap_or_else(|| location.coordinates());
        let transport = |e: anyhow::Error| FetchError::transport(kind.provider(), &e);

        let records = match kind {
            ResourceKind::Weather => {
                let payload = self.upstream.daily_forecast(at).await.map_err(transport)?;
                normalize::weather(&payload)?
                    .into_iter()
                    .map(ResourceData::Weather)
                    .collect()
            }
            ResourceKind::Meetup => {
                let payload = self.upstream.upcoming_events(at).await.map_err(transport)?;
                normalize::meetups(&payload)?
                    .into_iter()
                    .map(ResourceData::Meetup)
                    .collect()
            }
            ResourceKind::Movie => {
                let query = target
                    .search_query
                    .as_deref()
                    .filter(|q| !q.trim().is_empty())
                    .unwrap_or(&location.search_query);

                let (config, payload) = futures::future::try_join(
                    self.upstream.movie_configuration(),
                    self.upstream.search_movies(query),
                )
                .await
                .map_err(transport)?;

                let image_base = normalize::poster_base_url(&config)?;
                normalize::movies(&image_base, &payload)?
                    .into_iter()
                    .map(ResourceData::Movie)
                    .collect()
            }
            ResourceKind::Review => {
                let payload = self
                    .upstream
                    .search_businesses(at)
                    .await
                    .map_err(transport)?;
                normalize::reviews(&payload)?
                    .into_iter()
                    .map(ResourceData::Review)
                    .collect()
            }
            ResourceKind::Trail => {
                let payload = self.upstream.nearby_trails(at).await.map_err(transport)?;
                normalize::trails(&payload)?
                    .into_iter()
                    .map(ResourceData::Trail)
                    .collect()
            }
        };

        Ok(records)
    }

    async fn refresh(
        &self,
        kind: ResourceKind,
        location: &Location,
        target: &ResourceTarget,
    ) -> Result<Fetched, FetchError> {
        let data = self.fetch_upstream(kind, location, target).await?;
        let created_at = Utc::now();

        let report = self
            .store
            .insert_resources(kind, location.id, created_at, &data)
            .await;

        if report.is_complete() {
            debug!(
                kind = %kind,
                location_id = location.id,
                inserted = report.inserted,
                "Cached fresh records"
            );
        } else {
            warn!(
                kind = %kind,
                location_id = location.id,
                inserted = report.inserted,
                failed = report.failed,
                "Some records could not be cached; returning them uncached"
            );
            metrics::counter!("cache_write_failures_total", "kind" => kind.as_str())
                .increment(report.failed as u64);
        }

        let records = data
            .into_iter()
            .map(|data| CachedResource {
                location_id: location.id,
                created_at,
                data,
            })
            .collect();

        Ok(Fetched {
            status: CacheStatus::Refreshed,
            records,
            persisted: Some(report),
        })
    }
}

#[async_trait::async_trait]
impl ResourceService for SeaOrmResourceService {
    async fn resolve_location(&self, query: &str) -> Result<Location, FetchError> {
        if let Some(location) = self
            .store
            .lookup_location(query)
            .await
            .map_err(|e| FetchError::read(&e))?
        {
            debug!("Location '{}' served from cache", query);
            Self::record_outcome("location", "hit");
            return Ok(location);
        }

        let payload = self
            .upstream
            .geocode(query)
            .await
            .and_then(GeocodeResponse::ensure_ok)
            .map_err(|e| FetchError::transport(GEOCODER, &e))?;
        let new_location = normalize::location(query, &payload)?;

        match self.store.insert_location(new_location).await {
            Ok(location) => {
                info!(
                    "Geocoded '{}' as '{}' (id {})",
                    query, location.formatted_query, location.id
                );
                Self::record_outcome("location", "refreshed");
                Ok(location)
            }
            Err(insert_err) => {
                // A concurrent request may have stored the same query first.
                match self.store.lookup_location(query).await {
                    Ok(Some(existing)) => {
                        debug!("Location '{}' was stored concurrently", query);
                        return Ok(existing);
                    }
                    Ok(None) => {}
                    Err(read_err) => warn!(
                        "Re-reading location '{}' after a failed insert also failed: {:#}",
                        query, read_err
                    ),
                }
                Self::record_outcome("location", "error");
                Err(FetchError::write(&insert_err))
            }
        }
    }

    async fn fetch(
        &self,
        kind: ResourceKind,
        target: &ResourceTarget,
    ) -> Result<Fetched, FetchError> {
        let location_id = target.location_id;

        let cached = self
            .store
            .lookup_resources(kind, location_id)
            .await
            .map_err(|e| FetchError::read(&e))?;

        if let Some(first) = cached.first() {
            if freshness::is_fresh(kind, first.created_at, Utc::now()) {
                debug!(kind = %kind, location_id, rows = cached.len(), "Cache hit");
                Self::record_outcome(kind.as_str(), "hit");
                return Ok(Fetched {
                    status: CacheStatus::Hit,
                    records: cached,
                    persisted: None,
                });
            }
        }

        let location = self
            .store
            .get_location(location_id)
            .await
            .map_err(|e| FetchError::read(&e))?
            .ok_or(FetchError::LocationNotFound(location_id))?;

        if !cached.is_empty() {
            let purged = self
                .store
                .purge_resources(kind, location_id)
                .await
                .map_err(|e| FetchError::write(&e))?;
            info!(kind = %kind, location_id, purged, "Purged stale cache entries");
        }

        match self.refresh(kind, &location, target).await {
            Ok(fetched) => {
                Self::record_outcome(kind.as_str(), "refreshed");
                Ok(fetched)
            }
            Err(e) => {
                warn!(kind = %kind, location_id, error = %e, "Refresh failed");
                Self::record_outcome(kind.as_str(), "error");
                Err(e)
            }
        }
    }

    async fn invalidate(&self, kind: ResourceKind, location_id: i32) -> Result<u64, FetchError> {
        let purged = self
            .store
            .purge_resources(kind, location_id)
            .await
            .map_err(|e| FetchError::write(&e))?;
        info!(kind = %kind, location_id, purged, "Invalidated cache entries");
        Ok(purged)
    }
}
