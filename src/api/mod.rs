use axum::{
    Json, Router,
    http::{HeaderValue, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::clients::Upstream;
use crate::config::Config;
use crate::state::SharedState;

mod error;
mod location;
mod observability;
pub mod resources;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use crate::services::ResourceService;
use metrics_exporter_prometheus::PrometheusHandle;

pub const ROUTE_NOT_FOUND: &str = "Sorry, that route does not exist";

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn resources(&self) -> &Arc<dyn ResourceService> {
        &self.shared.resources
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

/// Same as [`create_app_state_from_config`] but with the given upstream
/// instead of the real provider clients.
pub async fn create_app_state_with_upstream(
    config: Config,
    upstream: Arc<dyn Upstream>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::with_upstream(config, upstream).await?);
    Ok(create_app_state(shared, None))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/location", get(location::get_location))
        .route("/weather", get(resources::get_weather))
        .route("/meetups", get(resources::get_meetups))
        .route("/movies", get(resources::get_movies))
        .route("/yelp", get(resources::get_reviews))
        .route("/trails", get(resources::get_trails))
        .route("/health", get(system::health))
        .route("/metrics", get(observability::get_metrics))
        .fallback(route_not_found)
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::track_metrics))
}

async fn route_not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(ROUTE_NOT_FOUND)),
    )
}
