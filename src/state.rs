use std::sync::Arc;

use crate::clients::{HttpUpstream, Upstream};
use crate::config::Config;
use crate::db::Store;
use crate::services::{ResourceService, SeaOrmResourceService};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub resources: Arc<dyn ResourceService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // One pooled HTTP client is shared by every provider.
        let upstream = Arc::new(HttpUpstream::new(&config.providers)?) as Arc<dyn Upstream>;
        Self::with_upstream(config, upstream).await
    }

    /// Builds the state around an existing upstream, e.g. a fake in tests.
    pub async fn with_upstream(config: Config, upstream: Arc<dyn Upstream>) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let resources = Arc::new(SeaOrmResourceService::new(store.clone(), upstream))
            as Arc<dyn ResourceService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            resources,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
