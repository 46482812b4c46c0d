//! CLI module - Command-line interface for City Explorer
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

use crate::domain::ResourceKind;

/// City Explorer - cached location data aggregator
/// Serves weather, meetups, movies, reviews and trails for a searched place
#[derive(Parser)]
#[command(name = "city-explorer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    #[command(alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Resolve a search query to a stored location
    #[command(alias = "loc")]
    Location {
        /// Free-text place name
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// Fetch one resource kind for a stored location
    #[command(alias = "f")]
    Fetch {
        /// weather, meetups, movies, yelp or trails
        kind: ResourceKind,
        /// Location ID
        location_id: i32,
        /// Search text for movies, overriding the location's query
        #[arg(long)]
        query: Option<String>,
    },

    /// Drop cached rows for one resource kind and location
    #[command(alias = "rm")]
    Purge {
        /// weather, meetups, movies, yelp or trails
        kind: ResourceKind,
        /// Location ID
        location_id: i32,
    },
}

pub use commands::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fetch_with_plural_kind() {
        let cli = Cli::try_parse_from(["city-explorer", "fetch", "trails", "5"]).unwrap();
        match cli.command {
            Some(Commands::Fetch {
                kind,
                location_id,
                query,
            }) => {
                assert_eq!(kind, ResourceKind::Trail);
                assert_eq!(location_id, 5);
                assert!(query.is_none());
            }
            _ => panic!("expected fetch command"),
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(Cli::try_parse_from(["city-explorer", "purge", "tides", "1"]).is_err());
    }

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["city-explorer"]).unwrap();
        assert!(cli.command.is_none());
    }
}
