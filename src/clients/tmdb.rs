use anyhow::Result;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::ProviderConfig;

pub const TMDB_API: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct TmdbConfiguration {
    #[serde(default)]
    pub images: Option<TmdbImages>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TmdbImages {
    pub secure_base_url: String,
    #[serde(default)]
    pub poster_sizes: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct MovieSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TmdbMovie {
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    #[must_use]
    pub fn with_shared_client(client: Client, config: &ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn configuration_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/configuration", self.base_url))?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    fn search_url(&self, query: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/search/movie", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("language", "en-US")
            .append_pair("query", query);
        Ok(url)
    }

    pub async fn configuration(&self) -> Result<TmdbConfiguration> {
        let url = self.configuration_url()?;

        debug!("Fetching TMDB configuration");

        let response: TmdbConfiguration = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }

    pub async fn search_movies(&self, query: &str) -> Result<MovieSearchResponse> {
        let url = self.search_url(query)?;

        debug!("Searching TMDB for '{}'", query);

        let response: MovieSearchResponse = self
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
