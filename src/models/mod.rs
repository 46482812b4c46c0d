pub mod location;
pub mod resource;

pub use location::{Location, NewLocation};
pub use resource::{CachedResource, Forecast, MeetupEvent, Movie, ResourceData, Review, Trail};
