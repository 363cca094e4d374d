pub mod aggregator;
pub mod engine;
pub mod fetcher;
pub mod ranker;
pub mod resolver;
pub mod snapshot;

pub use crate::domain::model::{
    EntityStandings, LeaderboardRow, MedalCount, ParticipantRecord, RankCriterion,
    RosterAssignment,
};
pub use crate::domain::ports::{SnapshotPublisher, StandingsSource, Storage};
pub use crate::utils::error::Result;
