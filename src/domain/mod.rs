// Domain layer: medal and leaderboard types plus the ports the pipeline talks through.

pub mod model;
pub mod ports;
