pub mod resource_service;
pub use resource_service::{FetchError, Fetched, ResourceService, ResourceTarget};

pub mod resource_service_impl;
pub use resource_service_impl::SeaOrmResourceService;
