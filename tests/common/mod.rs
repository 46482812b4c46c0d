#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use city_explorer::clients::Upstream;
use city_explorer::clients::darksky::ForecastResponse;
use city_explorer::clients::geocode::GeocodeResponse;
use city_explorer::clients::hiking::TrailsResponse;
use city_explorer::clients::meetup::EventsResponse;
use city_explorer::clients::tmdb::{MovieSearchResponse, TmdbConfiguration};
use city_explorer::clients::yelp::BusinessSearchResponse;
use city_explorer::config::Config;
use city_explorer::domain::Coordinates;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Upstream double serving canned JSON per endpoint.
#[derive(Default)]
pub struct FakeUpstream {
    payloads: Mutex<HashMap<&'static str, Value>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
}

impl FakeUpstream {
    /// Seattle geocode plus one populated payload per provider.
    pub fn seeded() -> Self {
        let fake = Self::default();
        fake.set(
            "geocode",
            json!({
                "status": "OK",
                "results": [{
                    "formatted_address": "Seattle, WA, USA",
                    "geometry": { "location": { "lat": 47.6062095, "lng": -122.3320708 } }
                }]
            }),
        );
        fake.set(
            "weather",
            json!({ "daily": { "data": [
                { "time": 1_705_276_800, "summary": "Foggy in the morning." },
                { "time": 1_705_363_200, "summary": "Light rain." },
                { "time": 1_705_449_600, "summary": "Clear throughout the day." }
            ]}}),
        );
        fake.set(
            "meetup",
            json!({ "events": [{
                "link": "https://www.meetup.com/seattle-rust/events/1/",
                "name": "Rust Night",
                "time": 1_705_276_800_000_i64,
                "group": { "name": "Seattle Rust" }
            }]}),
        );
        fake.set(
            "movie_config",
            json!({ "images": {
                "secure_base_url": "https://image.tmdb.org/t/p/",
                "poster_sizes": ["w92", "w154", "w185", "w342", "w500"]
            }}),
        );
        fake.set(
            "movies",
            json!({ "results": [{
                "title": "Sleepless in Seattle",
                "release_date": "1993-06-25",
                "vote_count": 1800,
                "vote_average": 6.7,
                "popularity": 12.5,
                "poster_path": "/sleepless.jpg",
                "overview": "A widowed architect..."
            }]}),
        );
        fake.set(
            "reviews",
            json!({ "businesses": [{
                "url": "https://www.yelp.com/biz/pike-place-chowder",
                "name": "Pike Place Chowder",
                "rating": 4.5,
                "price": "$$",
                "image_url": "https://s3-media.yelpcdn.com/chowder.jpg"
            }]}),
        );
        fake.set(
            "trails",
            json!({ "trails": [{
                "url": "https://www.hikingproject.com/trail/1",
                "name": "Rattlesnake Ledge",
                "location": "North Bend, Washington",
                "length": 4.3,
                "conditionStatus": "All Clear",
                "conditionDate": "2018-07-21 11:04:51",
                "stars": 4.4,
                "starVotes": 90,
                "summary": "A short climb with big views."
            }]}),
        );
        fake
    }

    pub fn set(&self, endpoint: &'static str, payload: Value) {
        self.payloads.lock().unwrap().insert(endpoint, payload);
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.failing.lock().unwrap().insert(endpoint);
    }

    pub fn calls(&self, endpoint: &'static str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    fn respond<T: serde::de::DeserializeOwned>(&self, endpoint: &'static str) -> anyhow::Result<T> {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
        if self.failing.lock().unwrap().contains(endpoint) {
            anyhow::bail!("connection refused");
        }
        let payload = self
            .payloads
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no payload for {endpoint}"))?;
        Ok(serde_json::from_value(payload)?)
    }
}

#[async_trait::async_trait]
impl Upstream for FakeUpstream {
    async fn geocode(&self, _query: &str) -> anyhow::Result<GeocodeResponse> {
        self.respond("geocode")
    }

    async fn daily_forecast(&self, _at: Coordinates) -> anyhow::Result<ForecastResponse> {
        self.respond("weather")
    }

    async fn upcoming_events(&self, _at: Coordinates) -> anyhow::Result<EventsResponse> {
        self.respond("meetup")
    }

    async fn movie_configuration(&self) -> anyhow::Result<TmdbConfiguration> {
        self.respond("movie_config")
    }

    async fn search_movies(&self, _query: &str) -> anyhow::Result<MovieSearchResponse> {
        self.respond("movies")
    }

    async fn search_businesses(&self, _at: Coordinates) -> anyhow::Result<BusinessSearchResponse> {
        self.respond("reviews")
    }

    async fn nearby_trails(&self, _at: Coordinates) -> anyhow::Result<TrailsResponse> {
        self.respond("trails")
    }
}

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config
}

pub async fn spawn_app(upstream: Arc<FakeUpstream>) -> Router {
    let state = city_explorer::api::create_app_state_with_upstream(test_config(), upstream)
        .await
        .expect("Failed to create app state");
    city_explorer::api::router(state)
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
