use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;

pub const GOOGLE_GEOCODE_API: &str = "https://maps.googleapis.com/maps/api/geocode/json";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl GeocodeResponse {
    /// Google answers rejected requests with HTTP 200 and a status code in the
    /// body. `OK` and `ZERO_RESULTS` are the only answers about the address
    /// itself; anything else is a provider failure.
    pub fn ensure_ok(self) -> Result<Self> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" | "" => Ok(self),
            status => anyhow::bail!(
                "geocoder returned {}: {}",
                status,
                self.error_message.as_deref().unwrap_or("no details")
            ),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeocodeResult {
    pub formatted_address: String,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Clone)]
pub struct GeocodeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GeocodeClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn geocode_url(&self, address: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("address", address);
        Ok(url)
    }

    pub async fn geocode(&self, address: &str) -> Result<GeocodeResponse> {
        let url = self.geocode_url(address)?;

        debug!("Geocoding '{}'", address);

        let response: GeocodeResponse = self
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
