//! Provider payload → normalized record mappings.
//!
//! Every function here is pure. An empty result collection is reported as
//! [`NormalizeError::Empty`] instead of producing an empty batch, so nothing
//! empty ever reaches the cache.

use chrono::DateTime;
use thiserror::Error;

use crate::clients::darksky::ForecastResponse;
use crate::clients::geocode::GeocodeResponse;
use crate::clients::hiking::TrailsResponse;
use crate::clients::meetup::EventsResponse;
use crate::clients::tmdb::{MovieSearchResponse, TmdbConfiguration};
use crate::clients::yelp::BusinessSearchResponse;
use crate::models::{Forecast, MeetupEvent, Movie, NewLocation, Review, Trail};

/// Calendar-day format used for forecast and event dates, e.g. `Mon Jan 15 2024`.
const DAY_FORMAT: &str = "%a %b %d %Y";

/// Preferred TMDB poster size slot.
const POSTER_SIZE_INDEX: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("no {0} data returned by provider")]
    Empty(&'static str),
}

fn day_from_unix_seconds(secs: i64) -> String {
    DateTime::from_timestamp(secs, 0)
        .map(|d| d.format(DAY_FORMAT).to_string())
        .unwrap_or_default()
}

fn day_from_unix_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|d| d.format(DAY_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn location(query: &str, payload: &GeocodeResponse) -> Result<NewLocation, NormalizeError> {
    let first = payload.results.first().ok_or(NormalizeError::Empty("location"))?;

    Ok(NewLocation {
        search_query: query.to_string(),
        formatted_query: first.formatted_address.clone(),
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
    })
}

pub fn weather(payload: &ForecastResponse) -> Result<Vec<Forecast>, NormalizeError> {
    let days = payload.days();
    if days.is_empty() {
        return Err(NormalizeError::Empty("weather"));
    }

    Ok(days
        .iter()
        .map(|day| Forecast {
            forecast: day.summary.clone().unwrap_or_default(),
            time: day_from_unix_seconds(day.time),
        })
        .collect())
}

pub fn meetups(payload: &EventsResponse) -> Result<Vec<MeetupEvent>, NormalizeError> {
    if payload.events.is_empty() {
        return Err(NormalizeError::Empty("meetup"));
    }

    Ok(payload
        .events
        .iter()
        .map(|event| MeetupEvent {
            link: event.link.clone(),
            name: event.name.clone(),
            creation_date: day_from_unix_millis(event.time),
            host: event
                .group
                .as_ref()
                .map(|g| g.name.clone())
                .unwrap_or_default(),
        })
        .collect())
}

/// Base URL for poster images: the secure base plus the fourth listed size,
/// or the largest listed size when fewer are offered.
pub fn poster_base_url(config: &TmdbConfiguration) -> Result<String, NormalizeError> {
    let images = config
        .images
        .as_ref()
        .ok_or(NormalizeError::Empty("movie configuration"))?;

    let size = images
        .poster_sizes
        .get(POSTER_SIZE_INDEX)
        .or_else(|| images.poster_sizes.last())
        .map_or("original", String::as_str);

    Ok(format!("{}{}", images.secure_base_url, size))
}

pub fn movies(
    image_base: &str,
    payload: &MovieSearchResponse,
) -> Result<Vec<Movie>, NormalizeError> {
    if payload.results.is_empty() {
        return Err(NormalizeError::Empty("movie"));
    }

    Ok(payload
        .results
        .iter()
        .map(|m| Movie {
            title: m.title.clone(),
            released_on: m.release_date.clone().unwrap_or_default(),
            total_votes: m.vote_count,
            average_votes: m.vote_average,
            popularity: m.popularity,
            image_url: m
                .poster_path
                .as_ref()
                .map(|path| format!("{image_base}{path}")),
            overview: m.overview.clone().unwrap_or_default(),
        })
        .collect())
}

pub fn reviews(payload: &BusinessSearchResponse) -> Result<Vec<Review>, NormalizeError> {
    if payload.businesses.is_empty() {
        return Err(NormalizeError::Empty("review"));
    }

    Ok(payload
        .businesses
        .iter()
        .map(|b| Review {
            url: b.url.clone(),
            name: b.name.clone(),
            rating: b.rating,
            price: b.price.clone(),
            image_url: b.image_url.clone(),
        })
        .collect())
}

pub fn trails(payload: &TrailsResponse) -> Result<Vec<Trail>, NormalizeError> {
    if payload.trails.is_empty() {
        return Err(NormalizeError::Empty("trail"));
    }

    Ok(payload
        .trails
        .iter()
        .map(|t| Trail {
            trail_url: t.url.clone(),
            name: t.name.clone(),
            location: t.location.clone(),
            length: t.length,
            condition_date: t.condition_date.chars().take(10).collect(),
            condition_time: t.condition_date.chars().skip(11).collect(),
            conditions: t.condition_status.clone(),
            stars: t.stars,
            star_votes: t.star_votes,
            summary: t.summary.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn location_uses_first_result() {
        let payload: GeocodeResponse = parse(json!({
            "status": "OK",
            "results": [
                {
                    "formatted_address": "Seattle, WA, USA",
                    "geometry": { "location": { "lat": 47.6062095, "lng": -122.3320708 } }
                },
                {
                    "formatted_address": "Seattle, Other",
                    "geometry": { "location": { "lat": 1.0, "lng": 2.0 } }
                }
            ]
        }));

        let loc = location("seattle", &payload).unwrap();
        assert_eq!(loc.search_query, "seattle");
        assert_eq!(loc.formatted_query, "Seattle, WA, USA");
        assert!((loc.latitude - 47.606_209_5).abs() < f64::EPSILON);
        assert!((loc.longitude + 122.332_070_8).abs() < f64::EPSILON);
    }

    #[test]
    fn location_without_results_is_empty() {
        let payload: GeocodeResponse = parse(json!({ "status": "ZERO_RESULTS", "results": [] }));
        assert_eq!(
            location("nowhere", &payload),
            Err(NormalizeError::Empty("location"))
        );
    }

    #[test]
    fn weather_maps_each_day() {
        let payload: ForecastResponse = parse(json!({
            "daily": { "data": [
                { "time": 1_705_276_800, "summary": "Foggy in the morning." },
                { "time": 1_705_363_200, "summary": "Light rain." },
                { "time": 1_705_449_600 }
            ]}
        }));

        let days = weather(&payload).unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].forecast, "Foggy in the morning.");
        assert_eq!(days[0].time, "Mon Jan 15 2024");
        assert_eq!(days[1].time, "Tue Jan 16 2024");
        assert_eq!(days[2].forecast, "");
    }

    #[test]
    fn weather_without_days_is_empty() {
        let payload: ForecastResponse = parse(json!({ "daily": { "data": [] } }));
        assert_eq!(weather(&payload), Err(NormalizeError::Empty("weather")));

        let payload: ForecastResponse = parse(json!({}));
        assert!(weather(&payload).is_err());
    }

    #[test]
    fn meetup_dates_come_from_millis() {
        let payload: EventsResponse = parse(json!({
            "events": [{
                "link": "https://www.meetup.com/rust/events/1",
                "name": "Rust Night",
                "time": 1_705_276_800_000_i64,
                "group": { "name": "Seattle Rust" }
            }]
        }));

        let events = meetups(&payload).unwrap();
        assert_eq!(
            events[0],
            MeetupEvent {
                link: "https://www.meetup.com/rust/events/1".to_string(),
                name: "Rust Night".to_string(),
                creation_date: "Mon Jan 15 2024".to_string(),
                host: "Seattle Rust".to_string(),
            }
        );
    }

    #[test]
    fn poster_base_prefers_fourth_size() {
        let config: TmdbConfiguration = parse(json!({
            "images": {
                "secure_base_url": "https://image.tmdb.org/t/p/",
                "poster_sizes": ["w92", "w154", "w185", "w342", "w500", "original"]
            }
        }));
        assert_eq!(
            poster_base_url(&config).unwrap(),
            "https://image.tmdb.org/t/p/w342"
        );

        let short: TmdbConfiguration = parse(json!({
            "images": { "secure_base_url": "https://img/", "poster_sizes": ["w92", "w154"] }
        }));
        assert_eq!(poster_base_url(&short).unwrap(), "https://img/w154");

        let missing: TmdbConfiguration = parse(json!({}));
        assert_eq!(
            poster_base_url(&missing),
            Err(NormalizeError::Empty("movie configuration"))
        );
    }

    #[test]
    fn movies_copy_fields_and_join_poster() {
        let payload: MovieSearchResponse = parse(json!({
            "results": [
                {
                    "title": "Sleepless in Seattle",
                    "release_date": "1993-06-24",
                    "vote_count": 1500,
                    "vote_average": 6.7,
                    "popularity": 12.5,
                    "poster_path": "/abc.jpg",
                    "overview": "A widowed architect..."
                },
                { "title": "No Poster", "poster_path": null }
            ]
        }));

        let movies = movies("https://image.tmdb.org/t/p/w342", &payload).unwrap();
        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].released_on, "1993-06-24");
        assert_eq!(movies[0].total_votes, 1500);
        assert_eq!(
            movies[0].image_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w342/abc.jpg")
        );
        assert!(movies[1].image_url.is_none());
    }

    #[test]
    fn reviews_copy_business_fields() {
        let payload: BusinessSearchResponse = parse(json!({
            "businesses": [{
                "url": "https://www.yelp.com/biz/pike-place-chowder",
                "name": "Pike Place Chowder",
                "rating": 4.5,
                "price": "$$",
                "image_url": "https://s3-media.yelp.com/chowder.jpg"
            }]
        }));

        let reviews = reviews(&payload).unwrap();
        assert_eq!(reviews[0].name, "Pike Place Chowder");
        assert_eq!(reviews[0].price.as_deref(), Some("$$"));
        assert!((reviews[0].rating - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn trail_condition_date_is_split_into_date_and_time() {
        let payload: TrailsResponse = parse(json!({
            "trails": [{
                "url": "https://www.hikingproject.com/trail/7011192",
                "name": "Rattlesnake Ledge",
                "location": "North Bend, Washington",
                "length": 4.3,
                "conditionStatus": "All Clear",
                "conditionDate": "2018-07-21 11:04:51",
                "stars": 4.4,
                "starVotes": 81,
                "summary": "A popular hike."
            }]
        }));

        let trails = trails(&payload).unwrap();
        assert_eq!(trails[0].condition_date, "2018-07-21");
        assert_eq!(trails[0].condition_time, "11:04:51");
        assert_eq!(trails[0].conditions, "All Clear");
        assert_eq!(trails[0].trail_url, "https://www.hikingproject.com/trail/7011192");
    }

    #[test]
    fn short_condition_date_does_not_panic() {
        let payload: TrailsResponse = parse(json!({
            "trails": [{ "url": "u", "name": "n", "conditionDate": "2018" }]
        }));
        let trails = trails(&payload).unwrap();
        assert_eq!(trails[0].condition_date, "2018");
        assert_eq!(trails[0].condition_time, "");
    }

    #[test]
    fn empty_collections_are_rejected_for_every_kind() {
        assert!(meetups(&parse(json!({ "events": [] }))).is_err());
        assert!(movies("base", &parse(json!({ "results": [] }))).is_err());
        assert!(reviews(&parse(json!({ "businesses": [] }))).is_err());
        assert!(trails(&parse(json!({ "trails": [] }))).is_err());
    }

    #[test]
    fn normalization_is_deterministic() {
        let payload: ForecastResponse = parse(json!({
            "daily": { "data": [{ "time": 1_705_276_800, "summary": "Clear." }] }
        }));
        assert_eq!(weather(&payload), weather(&payload));
    }
}
