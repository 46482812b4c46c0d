mod fetch;
mod location;
mod purge;

pub use fetch::cmd_fetch;
pub use location::cmd_location;
pub use purge::cmd_purge;
