//! Resource endpoints. One handler per route, all sharing [`fetch_kind`].

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderValue, header::HeaderName},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::{validate_coordinates, validate_location_id};
use super::{ApiError, ApiResponse, AppState};
use crate::domain::ResourceKind;
use crate::services::ResourceTarget;

pub const CACHE_HEADER: HeaderName = HeaderName::from_static("x-cache");

/// Query string of every resource route.
///
/// The browser client sends its location object as `data[id]=..&data[latitude]=..`,
/// so the bracketed names are accepted as aliases.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceQuery {
    #[serde(alias = "data[id]")]
    pub id: Option<String>,
    #[serde(alias = "data[latitude]")]
    pub latitude: Option<String>,
    #[serde(alias = "data[longitude]")]
    pub longitude: Option<String>,
    #[serde(alias = "data[search_query]")]
    pub search_query: Option<String>,
}

impl ResourceQuery {
    fn into_target(self) -> Result<ResourceTarget, ApiError> {
        let location_id = validate_location_id(self.id.as_deref())?;
        let coordinates = validate_coordinates(self.latitude.as_deref(), self.longitude.as_deref())?;
        let search_query = self
            .search_query
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());

        Ok(ResourceTarget {
            location_id,
            coordinates,
            search_query,
        })
    }
}

async fn fetch_kind(
    state: &AppState,
    kind: ResourceKind,
    params: ResourceQuery,
) -> Result<Response, ApiError> {
    let target = params.into_target()?;
    let fetched = state.resources().fetch(kind, &target).await?;

    let cache = HeaderValue::from_static(fetched.status.header_value());
    let body = Json(ApiResponse::success(fetched.records));
    Ok(([(CACHE_HEADER, cache)], body).into_response())
}

/// `GET /weather`
pub async fn get_weather(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    fetch_kind(&state, ResourceKind::Weather, params).await
}

/// `GET /meetups`
pub async fn get_meetups(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    fetch_kind(&state, ResourceKind::Meetup, params).await
}

/// `GET /movies`
pub async fn get_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    fetch_kind(&state, ResourceKind::Movie, params).await
}

/// `GET /yelp`
pub async fn get_reviews(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    fetch_kind(&state, ResourceKind::Review, params).await
}

/// `GET /trails`
pub async fn get_trails(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResourceQuery>,
) -> Result<Response, ApiError> {
    fetch_kind(&state, ResourceKind::Trail, params).await
}
