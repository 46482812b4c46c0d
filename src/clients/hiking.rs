use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::domain::Coordinates;

pub const HIKING_PROJECT_API: &str = "https://www.hikingproject.com/data/get-trails";

const MAX_RESULTS: &str = "20";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TrailsResponse {
    #[serde(default)]
    pub trails: Vec<HikingTrail>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HikingTrail {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub condition_status: String,
    /// `YYYY-MM-DD HH:MM:SS`
    #[serde(default)]
    pub condition_date: String,
    #[serde(default)]
    pub stars: f64,
    #[serde(default)]
    pub star_votes: i64,
    #[serde(default)]
    pub summary: String,
}

#[derive(Clone)]
pub struct HikingProjectClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HikingProjectClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn trails_url(&self, at: Coordinates) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("lat", &at.latitude.to_string())
            .append_pair("lon", &at.longitude.to_string())
            .append_pair("key", &self.api_key)
            .append_pair("maxResults", MAX_RESULTS);
        Ok(url)
    }

    pub async fn nearby_trails(&self, at: Coordinates) -> Result<TrailsResponse> {
        let url = self.trails_url(at)?;

        debug!("Fetching trails near {}", at);

        let response: TrailsResponse = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}
