use crate::domain::ResourceKind;
use crate::entities::{meetups, movies, prelude::*, reviews, trails, weathers};
use crate::models::{
    CachedResource, Forecast, MeetupEvent, Movie, ResourceData, Review, Trail,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

/// Repository for the per-kind resource tables.
///
/// Each kind maps to exactly one entity; every statement is built from that
/// entity's typed columns.
pub struct ResourceRepository {
    conn: DatabaseConnection,
}

impl ResourceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_weather(m: weathers::Model) -> CachedResource {
        CachedResource {
            location_id: m.location_id,
            created_at: m.created_at,
            data: ResourceData::Weather(Forecast {
                forecast: m.forecast,
                time: m.time,
            }),
        }
    }

    fn map_meetup(m: meetups::Model) -> CachedResource {
        CachedResource {
            location_id: m.location_id,
            created_at: m.created_at,
            data: ResourceData::Meetup(MeetupEvent {
                link: m.link,
                name: m.name,
                creation_date: m.creation_date,
                host: m.host,
            }),
        }
    }

    fn map_movie(m: movies::Model) -> CachedResource {
        CachedResource {
            location_id: m.location_id,
            created_at: m.created_at,
            data: ResourceData::Movie(Movie {
                title: m.title,
                released_on: m.released_on,
                total_votes: m.total_votes,
                average_votes: m.average_votes,
                popularity: m.popularity,
                image_url: m.image_url,
                overview: m.overview,
            }),
        }
    }

    fn map_review(m: reviews::Model) -> CachedResource {
        CachedResource {
            location_id: m.location_id,
            created_at: m.created_at,
            data: ResourceData::Review(Review {
                url: m.url,
                name: m.name,
                rating: m.rating,
                price: m.price,
                image_url: m.image_url,
            }),
        }
    }

    fn map_trail(m: trails::Model) -> CachedResource {
        CachedResource {
            location_id: m.location_id,
            created_at: m.created_at,
            data: ResourceData::Trail(Trail {
                trail_url: m.trail_url,
                name: m.name,
                location: m.location,
                length: m.length,
                condition_date: m.condition_date,
                condition_time: m.condition_time,
                conditions: m.conditions,
                stars: m.stars,
                star_votes: m.star_votes,
                summary: m.summary,
            }),
        }
    }

    // ========================================================================
    // Resource Operations
    // ========================================================================

    /// All rows for one kind and location, oldest insert first.
    pub async fn list(&self, kind: ResourceKind, location_id: i32) -> Result<Vec<CachedResource>> {
        let rows = match kind {
            ResourceKind::Weather => Weathers::find()
                .filter(weathers::Column::LocationId.eq(location_id))
                .order_by_asc(weathers::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_weather)
                .collect(),
            ResourceKind::Meetup => Meetups::find()
                .filter(meetups::Column::LocationId.eq(location_id))
                .order_by_asc(meetups::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_meetup)
                .collect(),
            ResourceKind::Movie => Movies::find()
                .filter(movies::Column::LocationId.eq(location_id))
                .order_by_asc(movies::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_movie)
                .collect(),
            ResourceKind::Review => Reviews::find()
                .filter(reviews::Column::LocationId.eq(location_id))
                .order_by_asc(reviews::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_review)
                .collect(),
            ResourceKind::Trail => Trails::find()
                .filter(trails::Column::LocationId.eq(location_id))
                .order_by_asc(trails::Column::Id)
                .all(&self.conn)
                .await?
                .into_iter()
                .map(Self::map_trail)
                .collect(),
        };

        Ok(rows)
    }

    /// Inserts a single record and returns its row id.
    pub async fn insert(
        &self,
        location_id: i32,
        created_at: DateTime<Utc>,
        data: &ResourceData,
    ) -> Result<i32> {
        let id = match data {
            ResourceData::Weather(f) => {
                let active_model = weathers::ActiveModel {
                    location_id: Set(location_id),
                    created_at: Set(created_at),
                    forecast: Set(f.forecast.clone()),
                    time: Set(f.time.clone()),
                    ..Default::default()
                };
                Weathers::insert(active_model)
                    .exec(&self.conn)
                    .await?
                    .last_insert_id
            }
            ResourceData::Meetup(e) => {
                let active_model = meetups::ActiveModel {
                    location_id: Set(location_id),
                    created_at: Set(created_at),
                    link: Set(e.link.clone()),
                    name: Set(e.name.clone()),
                    creation_date: Set(e.creation_date.clone()),
                    host: Set(e.host.clone()),
                    ..Default::default()
                };
                Meetups::insert(active_model)
                    .exec(&self.conn)
                    .await?
                    .last_insert_id
            }
            ResourceData::Movie(m) => {
                let active_model = movies::ActiveModel {
                    location_id: Set(location_id),
                    created_at: Set(created_at),
                    title: Set(m.title.clone()),
                    released_on: Set(m.released_on.clone()),
                    total_votes: Set(m.total_votes),
                    average_votes: Set(m.average_votes),
                    popularity: Set(m.popularity),
                    image_url: Set(m.image_url.clone()),
                    overview: Set(m.overview.clone()),
                    ..Default::default()
                };
                Movies::insert(active_model)
                    .exec(&self.conn)
                    .await?
                    .last_insert_id
            }
            ResourceData::Review(r) => {
                let active_model = reviews::ActiveModel {
                    location_id: Set(location_id),
                    created_at: Set(created_at),
                    url: Set(r.url.clone()),
                    name: Set(r.name.clone()),
                    rating: Set(r.rating),
                    price: Set(r.price.clone()),
                    image_url: Set(r.image_url.clone()),
                    ..Default::default()
                };
                Reviews::insert(active_model)
                    .exec(&self.conn)
                    .await?
                    .last_insert_id
            }
            ResourceData::Trail(t) => {
                let active_model = trails::ActiveModel {
                    location_id: Set(location_id),
                    created_at: Set(created_at),
                    trail_url: Set(t.trail_url.clone()),
                    name: Set(t.name.clone()),
                    location: Set(t.location.clone()),
                    length: Set(t.length),
                    condition_date: Set(t.condition_date.clone()),
                    condition_time: Set(t.condition_time.clone()),
                    conditions: Set(t.conditions.clone()),
                    stars: Set(t.stars),
                    star_votes: Set(t.star_votes),
                    summary: Set(t.summary.clone()),
                    ..Default::default()
                };
                Trails::insert(active_model)
                    .exec(&self.conn)
                    .await?
                    .last_insert_id
            }
        };

        Ok(id)
    }

    /// Deletes every row for one kind and location.
    pub async fn purge(&self, kind: ResourceKind, location_id: i32) -> Result<u64> {
        let result = match kind {
            ResourceKind::Weather => {
                Weathers::delete_many()
                    .filter(weathers::Column::LocationId.eq(location_id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Meetup => {
                Meetups::delete_many()
                    .filter(meetups::Column::LocationId.eq(location_id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Movie => {
                Movies::delete_many()
                    .filter(movies::Column::LocationId.eq(location_id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Review => {
                Reviews::delete_many()
                    .filter(reviews::Column::LocationId.eq(location_id))
                    .exec(&self.conn)
                    .await?
            }
            ResourceKind::Trail => {
                Trails::delete_many()
                    .filter(trails::Column::LocationId.eq(location_id))
                    .exec(&self.conn)
                    .await?
            }
        };

        Ok(result.rows_affected)
    }

    pub async fn count(&self, kind: ResourceKind, location_id: i32) -> Result<u64> {
        let count = match kind {
            ResourceKind::Weather => {
                Weathers::find()
                    .filter(weathers::Column::LocationId.eq(location_id))
                    .count(&self.conn)
                    .await?
            }
            ResourceKind::Meetup => {
                Meetups::find()
                    .filter(meetups::Column::LocationId.eq(location_id))
                    .count(&self.conn)
                    .await?
            }
            ResourceKind::Movie => {
                Movies::find()
                    .filter(movies::Column::LocationId.eq(location_id))
                    .count(&self.conn)
                    .await?
            }
            ResourceKind::Review => {
                Reviews::find()
                    .filter(reviews::Column::LocationId.eq(location_id))
                    .count(&self.conn)
                    .await?
            }
            ResourceKind::Trail => {
                Trails::find()
                    .filter(trails::Column::LocationId.eq(location_id))
                    .count(&self.conn)
                    .await?
            }
        };

        Ok(count)
    }
}
