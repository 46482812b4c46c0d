use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::clients::{darksky, geocode, hiking, meetup, tmdb, yelp};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub providers: ProvidersConfig,

    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    /// Maximum database connections (default: 5)
    pub max_db_connections: u32,

    /// Minimum database connections (default: 1)
    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/city-explorer.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Credentials and endpoint of a single upstream API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: String,

    pub base_url: String,
}

impl ProviderConfig {
    fn with_base_url(base_url: &str) -> Self {
        Self {
            api_key: String::new(),
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Per-request timeout for every upstream call (default: 30)
    pub request_timeout_seconds: u32,

    pub geocode: ProviderConfig,

    pub weather: ProviderConfig,

    pub meetup: ProviderConfig,

    pub movies: ProviderConfig,

    pub reviews: ProviderConfig,

    pub trails: ProviderConfig,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 30,
            geocode: ProviderConfig::with_base_url(geocode::GOOGLE_GEOCODE_API),
            weather: ProviderConfig::with_base_url(darksky::DARK_SKY_API),
            meetup: ProviderConfig::with_base_url(meetup::MEETUP_API),
            movies: ProviderConfig::with_base_url(tmdb::TMDB_API),
            reviews: ProviderConfig::with_base_url(yelp::YELP_API),
            trails: ProviderConfig::with_base_url(hiking::HIKING_PROJECT_API),
        }
    }
}

impl ProvidersConfig {
    fn named(&self) -> [(&'static str, &ProviderConfig); 6] {
        [
            ("geocode", &self.geocode),
            ("weather", &self.weather),
            ("meetup", &self.meetup),
            ("movies", &self.movies),
            ("reviews", &self.reviews),
            ("trails", &self.trails),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Config {
    /// Loads the first config file found (or defaults), then applies `.env`
    /// and process environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::load_file()?;
        config.apply_env_with(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn load_file() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Applies the environment variables the hosted deployment sets.
    /// `lookup` is `std::env::var` in production.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(url) = get("DATABASE_URL") {
            self.general.database_path = url;
        }

        let keys = [
            ("GOOGLE_MAPS_API_KEY", &mut self.providers.geocode),
            ("DARK_SKY_API_KEY", &mut self.providers.weather),
            ("MEETUP_API_KEY", &mut self.providers.meetup),
            ("MOVIE_DB_API_KEY", &mut self.providers.movies),
            ("YELP_API_KEY", &mut self.providers.reviews),
            ("HIKING_API_KEY", &mut self.providers.trails),
        ];
        for (var, provider) in keys {
            if let Some(key) = get(var) {
                provider.api_key = key;
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("city-explorer").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".city-explorer").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be > 0");
        }

        if self.providers.request_timeout_seconds == 0 {
            anyhow::bail!("Provider request timeout must be > 0");
        }

        for (name, provider) in self.providers.named() {
            if provider.base_url.trim().is_empty() {
                anyhow::bail!("Base URL for provider '{name}' cannot be empty");
            }
        }

        Ok(())
    }

    /// Names of providers that have no API key configured.
    #[must_use]
    pub fn missing_api_keys(&self) -> Vec<&'static str> {
        self.providers
            .named()
            .into_iter()
            .filter(|(_, p)| p.api_key.is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.providers.request_timeout_seconds, 30);
        assert_eq!(config.providers.weather.base_url, darksky::DARK_SKY_API);
        assert!(config.validate().is_ok());
        assert_eq!(config.missing_api_keys().len(), 6);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[server]"));
        assert!(toml_str.contains("[providers.geocode]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [providers]
            request_timeout_seconds = 5

            [providers.reviews]
            api_key = "yelp-key"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.providers.request_timeout_seconds, 5);
        assert_eq!(config.providers.reviews.api_key, "yelp-key");

        // Untouched sections keep their defaults.
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.providers.trails.base_url, hiking::HIKING_PROJECT_API);
    }

    #[test]
    fn env_overrides_port_database_and_keys() {
        let env: HashMap<&str, &str> = [
            ("PORT", "8080"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DARK_SKY_API_KEY", "sky"),
            ("YELP_API_KEY", "yelp"),
            ("HIKING_API_KEY", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_with(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.general.database_path, "sqlite::memory:");
        assert_eq!(config.providers.weather.api_key, "sky");
        assert_eq!(config.providers.reviews.api_key, "yelp");
        assert!(config.providers.trails.api_key.is_empty());
        assert!(!config.missing_api_keys().contains(&"weather"));
    }

    #[test]
    fn invalid_port_is_ignored() {
        let mut config = Config::default();
        config.apply_env_with(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn validation_rejects_zero_timeout_and_empty_base_url() {
        let mut config = Config::default();
        config.providers.request_timeout_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.movies.base_url = String::new();
        assert!(config.validate().is_err());
    }
}
