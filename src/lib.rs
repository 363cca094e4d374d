pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{CsvPublisher, LocalStorage, SheetsPublisher};
pub use config::LeaderboardConfig;
pub use self::core::{engine::LeaderboardEngine, fetcher::StandingsFetcher, resolver::EntityResolver};
pub use utils::error::{LeaderboardError, Result};
