//! Time-to-live rules for cached resources.
//!
//! Freshness is decided per `(location, kind)` partition: the caller passes the
//! `created_at` of the first cached row and every row in the partition shares
//! the verdict.

use chrono::{DateTime, Duration, Utc};

use crate::domain::ResourceKind;

/// Maximum age of a cached row before it must be refetched.
#[must_use]
pub fn ttl(kind: ResourceKind) -> Duration {
    match kind {
        ResourceKind::Weather => Duration::seconds(15),
        ResourceKind::Review => Duration::days(7),
        ResourceKind::Meetup => Duration::hours(6),
        ResourceKind::Movie => Duration::days(30),
        ResourceKind::Trail => Duration::hours(6),
    }
}

/// A row is fresh while its age is strictly below the kind's TTL.
///
/// Rows stamped in the future (clock skew between writers) have a negative
/// age and are therefore fresh.
#[must_use]
pub fn is_fresh(kind: ResourceKind, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(created_at) < ttl(kind)
}

/// When a row created at `created_at` stops being fresh.
#[must_use]
pub fn expires_at(kind: ResourceKind, created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + ttl(kind)
}
