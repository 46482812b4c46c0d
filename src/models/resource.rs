use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ResourceKind;

/// One day of a weather forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub forecast: String,
    pub time: String,
}

/// An upcoming event near a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetupEvent {
    pub link: String,
    pub name: String,
    pub creation_date: String,
    pub host: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub released_on: String,
    pub total_votes: i64,
    pub average_votes: f64,
    pub popularity: f64,
    pub image_url: Option<String>,
    pub overview: String,
}

/// A business listing with its rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub url: String,
    pub name: String,
    pub rating: f64,
    pub price: Option<String>,
    pub image_url: Option<String>,
}

/// A hiking trail and its last reported condition.
///
/// `condition_date` and `condition_time` are the date and time-of-day halves
/// of the provider's `conditionDate` timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub trail_url: String,
    pub name: String,
    pub location: String,
    pub length: f64,
    pub condition_date: String,
    pub condition_time: String,
    pub conditions: String,
    pub stars: f64,
    pub star_votes: i64,
    pub summary: String,
}

/// Kind-specific payload of a cached row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceData {
    Weather(Forecast),
    Meetup(MeetupEvent),
    Movie(Movie),
    Review(Review),
    Trail(Trail),
}

impl ResourceData {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        match self {
            Self::Weather(_) => ResourceKind::Weather,
            Self::Meetup(_) => ResourceKind::Meetup,
            Self::Movie(_) => ResourceKind::Movie,
            Self::Review(_) => ResourceKind::Review,
            Self::Trail(_) => ResourceKind::Trail,
        }
    }
}

/// A normalized record attached to a location, as stored and as returned to
/// callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CachedResource {
    pub location_id: i32,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: ResourceData,
}

impl CachedResource {
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.data.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cached_resource_serializes_flat() {
        let record = CachedResource {
            location_id: 5,
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            data: ResourceData::Weather(Forecast {
                forecast: "Light rain".to_string(),
                time: "Tue Nov 14 2023".to_string(),
            }),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["location_id"], 5);
        assert_eq!(json["forecast"], "Light rain");
        assert_eq!(json["time"], "Tue Nov 14 2023");
        assert!(json["created_at"].is_string());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn data_reports_its_kind() {
        let review = ResourceData::Review(Review {
            url: "https://example.com".to_string(),
            name: "Cafe".to_string(),
            rating: 4.5,
            price: None,
            image_url: None,
        });
        assert_eq!(review.kind(), ResourceKind::Review);
    }
}
