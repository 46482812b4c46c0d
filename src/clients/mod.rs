//! HTTP clients for the upstream providers, one per resource kind plus the
//! geocoder, and the [`Upstream`] seam the fetch service calls through.

pub mod darksky;
pub mod geocode;
pub mod hiking;
pub mod meetup;
pub mod tmdb;
pub mod yelp;

use anyhow::Result;
use std::time::Duration;

use crate::config::ProvidersConfig;
use crate::domain::Coordinates;

use darksky::{DarkSkyClient, ForecastResponse};
use geocode::{GeocodeClient, GeocodeResponse};
use hiking::{HikingProjectClient, TrailsResponse};
use meetup::{EventsResponse, MeetupClient};
use tmdb::{MovieSearchResponse, TmdbClient, TmdbConfiguration};
use yelp::{BusinessSearchResponse, YelpClient};

/// Raw access to every upstream provider.
///
/// Implementations return the provider's payload untouched; normalization
/// happens in [`crate::normalize`].
#[async_trait::async_trait]
pub trait Upstream: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse>;

    async fn daily_forecast(&self, at: Coordinates) -> Result<ForecastResponse>;

    async fn upcoming_events(&self, at: Coordinates) -> Result<EventsResponse>;

    async fn movie_configuration(&self) -> Result<TmdbConfiguration>;

    async fn search_movies(&self, query: &str) -> Result<MovieSearchResponse>;

    async fn search_businesses(&self, at: Coordinates) -> Result<BusinessSearchResponse>;

    async fn nearby_trails(&self, at: Coordinates) -> Result<TrailsResponse>;
}

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused across all providers so they share one connection pool.
pub fn build_shared_http_client(timeout_seconds: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("city-explorer/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

/// [`Upstream`] backed by the real provider APIs.
#[derive(Clone)]
pub struct HttpUpstream {
    geocode: GeocodeClient,
    weather: DarkSkyClient,
    meetup: MeetupClient,
    movies: TmdbClient,
    reviews: YelpClient,
    trails: HikingProjectClient,
}

impl HttpUpstream {
    pub fn new(config: &ProvidersConfig) -> Result<Self> {
        let client = build_shared_http_client(config.request_timeout_seconds.into())?;
        Ok(Self::with_shared_client(client, config))
    }

    #[must_use]
    pub fn with_shared_client(client: reqwest::Client, config: &ProvidersConfig) -> Self {
        Self {
            geocode: GeocodeClient::with_shared_client(client.clone(), &config.geocode),
            weather: DarkSkyClient::with_shared_client(client.clone(), &config.weather),
            meetup: MeetupClient::with_shared_client(client.clone(), &config.meetup),
            movies: TmdbClient::with_shared_client(client.clone(), &config.movies),
            reviews: YelpClient::with_shared_client(client.clone(), &config.reviews),
            trails: HikingProjectClient::with_shared_client(client, &config.trails),
        }
    }
}

#[async_trait::async_trait]
impl Upstream for HttpUpstream {
    async fn geocode(&self, query: &str) -> Result<GeocodeResponse> {
        self.geocode.geocode(query).await
    }

    async fn daily_forecast(&self, at: Coordinates) -> Result<ForecastResponse> {
        self.weather.daily_forecast(at).await
    }

    async fn upcoming_events(&self, at: Coordinates) -> Result<EventsResponse> {
        self.meetup.upcoming_events(at).await
    }

    async fn movie_configuration(&self) -> Result<TmdbConfiguration> {
        self.movies.configuration().await
    }

    async fn search_movies(&self, query: &str) -> Result<MovieSearchResponse> {
        self.movies.search_movies(query).await
    }

    async fn search_businesses(&self, at: Coordinates) -> Result<BusinessSearchResponse> {
        self.reviews.search_businesses(at).await
    }

    async fn nearby_trails(&self, at: Coordinates) -> Result<TrailsResponse> {
        self.trails.nearby_trails(at).await
    }
}
