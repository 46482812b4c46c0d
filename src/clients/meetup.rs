use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;
use crate::domain::Coordinates;

pub const MEETUP_API: &str = "https://api.meetup.com/find/upcoming_events";

const PAGE_SIZE: &str = "20";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct EventsResponse {
    #[serde(default)]
    pub events: Vec<MeetupApiEvent>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MeetupApiEvent {
    pub link: String,
    pub name: String,
    /// Event start, Unix milliseconds.
    pub time: i64,
    #[serde(default)]
    pub group: Option<MeetupGroup>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MeetupGroup {
    pub name: String,
}

#[derive(Clone)]
pub struct MeetupClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl MeetupClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn events_url(&self, at: Coordinates) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.query_pairs_mut()
            .append_pair("lat", &at.latitude.to_string())
            .append_pair("lon", &at.longitude.to_string())
            .append_pair("sign", "true")
            .append_pair("key", &self.api_key)
            .append_pair("page", PAGE_SIZE);
        Ok(url)
    }

    pub async fn upcoming_events(&self, at: Coordinates) -> Result<EventsResponse> {
        let url = self.events_url(at)?;

        debug!("Fetching upcoming events near {}", at);

        let response: EventsResponse = self
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
