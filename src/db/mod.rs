use crate::domain::ResourceKind;
use crate::models::{CachedResource, Location, NewLocation, ResourceData};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub mod migrator;
pub mod repositories;

/// Outcome of a best-effort batch insert.
///
/// Records are written one at a time; a rejected record is counted here and
/// never stops the records after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub inserted: usize,
    pub failed: usize,
}

impl PersistReport {
    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.inserted + self.failed
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

fn is_in_memory(db_url: &str) -> bool {
    db_url.contains(":memory:") || db_url.contains("mode=memory")
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let in_memory = is_in_memory(db_url);

        if !in_memory {
            let path_str = db_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .sqlx_logging(false);

        // Every SQLite in-memory connection is its own database, so the pool
        // must hold exactly one connection that is never recycled.
        let (max_connections, min_connections) = if in_memory {
            opt.max_connections(1).min_connections(1);
            (1, 1)
        } else {
            opt.max_connections(max_connections)
                .min_connections(min_connections)
                .idle_timeout(Duration::from_secs(300))
                .max_lifetime(Duration::from_secs(600));
            (max_connections, min_connections)
        };

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn location_repo(&self) -> repositories::location::LocationRepository {
        repositories::location::LocationRepository::new(self.conn.clone())
    }

    fn resource_repo(&self) -> repositories::resource::ResourceRepository {
        repositories::resource::ResourceRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Locations
    // ========================================================================

    pub async fn lookup_location(&self, query: &str) -> Result<Option<Location>> {
        self.location_repo().find_by_query(query).await
    }

    pub async fn get_location(&self, id: i32) -> Result<Option<Location>> {
        self.location_repo().get(id).await
    }

    pub async fn insert_location(&self, location: NewLocation) -> Result<Location> {
        self.location_repo().insert(location).await
    }

    #[cfg(test)]
    pub async fn delete_location(&self, id: i32) -> Result<bool> {
        self.location_repo().delete(id).await
    }

    // ========================================================================
    // Cached resources
    // ========================================================================

    pub async fn lookup_resources(
        &self,
        kind: ResourceKind,
        location_id: i32,
    ) -> Result<Vec<CachedResource>> {
        self.resource_repo().list(kind, location_id).await
    }

    /// Writes each record under `location_id`, stamping all of them with
    /// `created_at`. Failures are logged and counted, never propagated.
    pub async fn insert_resources(
        &self,
        kind: ResourceKind,
        location_id: i32,
        created_at: DateTime<Utc>,
        records: &[ResourceData],
    ) -> PersistReport {
        let repo = self.resource_repo();
        let mut report = PersistReport::default();

        for record in records {
            if record.kind() != kind {
                warn!(
                    kind = %kind,
                    record_kind = %record.kind(),
                    location_id,
                    "Refusing to cache record under the wrong kind"
                );
                report.failed += 1;
                continue;
            }

            match repo.insert(location_id, created_at, record).await {
                Ok(_) => report.inserted += 1,
                Err(e) => {
                    warn!(kind = %kind, location_id, error = %e, "Failed to cache record");
                    report.failed += 1;
                }
            }
        }

        report
    }

    pub async fn purge_resources(&self, kind: ResourceKind, location_id: i32) -> Result<u64> {
        self.resource_repo().purge(kind, location_id).await
    }

    pub async fn count_resources(&self, kind: ResourceKind, location_id: i32) -> Result<u64> {
        self.resource_repo().count(kind, location_id).await
    }
}
