use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::domain::Coordinates;

pub const YELP_API: &str = "https://api.yelp.com/v3/businesses/search";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct BusinessSearchResponse {
    #[serde(default)]
    pub businesses: Vec<YelpBusiness>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YelpBusiness {
    pub url: String,
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone)]
pub struct YelpClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YelpClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn search_url(&self, at: Coordinates) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("latitude", &at.latitude.to_string())
            .append_pair("longitude", &at.longitude.to_string());
        Ok(url)
    }

    pub async fn search_businesses(&self, at: Coordinates) -> Result<BusinessSearchResponse> {
        let url = self.search_url(at)?;

        debug!("Searching Yelp businesses near {}", at);

        let response: BusinessSearchResponse = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}
