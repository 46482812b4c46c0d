//! Domain primitives shared by the cache, the providers and the HTTP layer.
//!
//! Every cached resource belongs to exactly one [`ResourceKind`]. The kind
//! decides which table rows live in, which upstream provider refreshes them and
//! how long they stay fresh.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five location-scoped resource kinds served from the cache.
///
/// Locations themselves are not a `ResourceKind`: they never expire and are
/// keyed by search text instead of by parent location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Weather,
    Meetup,
    Movie,
    Review,
    Trail,
}

impl ResourceKind {
    pub const ALL: [Self; 5] = [
        Self::Weather,
        Self::Meetup,
        Self::Movie,
        Self::Review,
        Self::Trail,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Meetup => "meetup",
            Self::Movie => "movie",
            Self::Review => "review",
            Self::Trail => "trail",
        }
    }

    /// Human readable name of the upstream service that feeds this kind.
    #[must_use]
    pub const fn provider(self) -> &'static str {
        match self {
            Self::Weather => "Dark Sky",
            Self::Meetup => "Meetup",
            Self::Movie => "TMDB",
            Self::Review => "Yelp",
            Self::Trail => "Hiking Project",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown resource kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown resource kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownKind;

    /// Accepts singular names as well as the plural route names
    /// (`meetups`, `movies`, `trails`) and `yelp` for reviews.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weather" => Ok(Self::Weather),
            "meetup" | "meetups" => Ok(Self::Meetup),
            "movie" | "movies" => Ok(Self::Movie),
            "review" | "reviews" | "yelp" => Ok(Self::Review),
            "trail" | "trails" => Ok(Self::Trail),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// How a resource request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CacheStatus {
    /// Served from cached rows that passed the freshness check.
    Hit,
    /// Cache was empty or stale; rows were fetched from upstream.
    Refreshed,
}

impl CacheStatus {
    #[must_use]
    pub const fn header_value(self) -> &'static str {
        match self {
            Self::Hit => "HIT",
            Self::Refreshed => "MISS",
        }
    }
}
