use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::validation::validate_search_query;
use super::{ApiError, ApiResponse, AppState};
use crate::models::Location;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub data: Option<String>,
}

/// Resolves free text to a stored location, geocoding it on first use.
///
/// # Endpoint
/// `GET /location?data=<query>`
pub async fn get_location(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LocationQuery>,
) -> Result<Json<ApiResponse<Location>>, ApiError> {
    let query = validate_search_query(params.data.as_deref().unwrap_or_default())?;
    let location = state.resources().resolve_location(query).await?;
    Ok(Json(ApiResponse::success(location)))
}
