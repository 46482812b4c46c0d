pub use super::locations::Entity as Locations;
pub use super::meetups::Entity as Meetups;
pub use super::movies::Entity as Movies;
pub use super::reviews::Entity as Reviews;
pub use super::trails::Entity as Trails;
pub use super::weathers::Entity as Weathers;
