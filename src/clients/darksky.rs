use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::domain::Coordinates;

pub const DARK_SKY_API: &str = "https://api.darksky.net/forecast";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ForecastResponse {
    #[serde(default)]
    pub daily: Option<DailyBlock>,
}

impl ForecastResponse {
    #[must_use]
    pub fn days(&self) -> &[DailyPoint] {
        self.daily.as_ref().map_or(&[], |d| d.data.as_slice())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DailyBlock {
    #[serde(default)]
    pub data: Vec<DailyPoint>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DailyPoint {
    /// Unix timestamp in seconds.
    pub time: i64,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Clone)]
pub struct DarkSkyClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DarkSkyClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn forecast_url(&self, at: Coordinates) -> Result<Url> {
        let url = format!("{}/{}/{}", self.base_url, self.api_key, at);
        Ok(Url::parse(&url)?)
    }

    pub async fn daily_forecast(&self, at: Coordinates) -> Result<ForecastResponse> {
        let url = self.forecast_url(at)?;

        debug!("Fetching forecast for {}", at);

        let response: ForecastResponse = self
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
