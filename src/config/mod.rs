pub mod toml_config;

pub use toml_config::LeaderboardConfig;

#[cfg(feature = "cli")]
use crate::domain::model::RankCriterion;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "medal-board")]
#[command(about = "Fantasy medal draft leaderboard: fetch standings, rank participants, publish")]
pub struct CliArgs {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "leaderboard.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Override the ranking criterion (total_medals or weighted_score)
    #[arg(long)]
    pub rank_by: Option<RankCriterion>,

    /// Fetch and rank, print the table, publish nothing
    #[arg(long)]
    pub dry_run: bool,
}
