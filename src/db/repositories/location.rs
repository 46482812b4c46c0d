use crate::entities::{locations, prelude::*};
use crate::models::{Location, NewLocation};
use anyhow::Result;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::debug;

/// Repository for geocoded locations.
pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: locations::Model) -> Location {
        Location {
            id: m.id,
            search_query: m.search_query,
            formatted_query: m.formatted_query,
            latitude: m.latitude,
            longitude: m.longitude,
        }
    }

    /// Exact, case-sensitive match on the original search text.
    pub async fn find_by_query(&self, query: &str) -> Result<Option<Location>> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(query))
            .one(&self.conn)
            .await?;

        Ok(row.map(Self::map_model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Location>> {
        let row = Locations::find_by_id(id).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn insert(&self, location: NewLocation) -> Result<Location> {
        let active_model = locations::ActiveModel {
            search_query: Set(location.search_query.clone()),
            formatted_query: Set(location.formatted_query.clone()),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            ..Default::default()
        };

        let res = Locations::insert(active_model).exec(&self.conn).await?;
        debug!(
            "Stored location {} for query '{}'",
            res.last_insert_id, location.search_query
        );

        Ok(location.with_id(res.last_insert_id))
    }

    #[cfg(test)]
    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Locations::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
