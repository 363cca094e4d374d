use crate::core::snapshot::{self, PublishClock};
use crate::core::{aggregator, ranker};
use crate::domain::model::{LeaderboardRow, RankCriterion, RosterAssignment};
use crate::domain::ports::{SnapshotPublisher, StandingsSource};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunReport {
    pub timestamp: String,
    pub destination: String,
    pub rows: Vec<LeaderboardRow>,
}

/// One fetch, aggregate, rank and publish pass. Nothing is written unless
/// every step before the publish succeeded.
pub struct LeaderboardEngine<S: StandingsSource, P: SnapshotPublisher> {
    source: S,
    publisher: P,
    roster: RosterAssignment,
    criterion: RankCriterion,
    clock: PublishClock,
}

impl<S: StandingsSource, P: SnapshotPublisher> LeaderboardEngine<S, P> {
    pub fn new(source: S, publisher: P, roster: RosterAssignment) -> Self {
        Self {
            source,
            publisher,
            roster,
            criterion: RankCriterion::default(),
            clock: PublishClock::default(),
        }
    }

    pub fn with_criterion(mut self, criterion: RankCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_clock(mut self, clock: PublishClock) -> Self {
        self.clock = clock;
        self
    }

    /// Fetches and ranks without publishing.
    pub async fn build(&self) -> Result<Vec<LeaderboardRow>> {
        tracing::info!("Fetching standings from {}", self.source.describe());
        let standings = self.source.fetch().await?;
        tracing::info!("Fetched standings for {} entities", standings.len());

        let records = aggregator::aggregate(&self.roster, &standings);
        tracing::debug!("Aggregated {} participants", records.len());

        let rows = ranker::rank(records, self.criterion);
        tracing::debug!("Ranked leaderboard by {}", self.criterion);
        Ok(rows)
    }

    pub async fn run(&self) -> Result<RunReport> {
        let rows = self.build().await?;

        let timestamp = self.clock.now();
        let header = snapshot::header_line(&timestamp);
        tracing::info!(
            "Publishing {} rows to {}",
            rows.len(),
            self.publisher.destination()
        );
        self.publisher.publish(&header, &rows).await?;

        tracing::info!("Leaderboard updated LIVE at {}", timestamp);
        Ok(RunReport {
            timestamp,
            destination: self.publisher.destination(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EntityStandings, MedalCount};
    use crate::utils::error::LeaderboardError;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct FixedSource(Option<EntityStandings>);

    #[async_trait]
    impl StandingsSource for FixedSource {
        async fn fetch(&self) -> Result<EntityStandings> {
            self.0
                .clone()
                .ok_or_else(|| LeaderboardError::source_unavailable("connection refused"))
        }

        fn describe(&self) -> String {
            "fixed".to_string()
        }
    }

    #[derive(Clone, Default)]
    struct RecordingPublisher {
        published: Arc<Mutex<Vec<(String, Vec<LeaderboardRow>)>>>,
        fail: bool,
    }

    #[async_trait]
    impl SnapshotPublisher for RecordingPublisher {
        async fn publish(&self, header: &str, rows: &[LeaderboardRow]) -> Result<()> {
            if self.fail {
                return Err(LeaderboardError::publish_failure("sink rejected write"));
            }
            self.published
                .lock()
                .unwrap()
                .push((header.to_string(), rows.to_vec()));
            Ok(())
        }

        fn destination(&self) -> String {
            "memory".to_string()
        }
    }

    fn roster() -> RosterAssignment {
        [("B", vec!["NOR"]), ("A", vec!["ITA"]), ("C", vec!["KOR", "XXX"])]
            .into_iter()
            .collect()
    }

    fn standings() -> EntityStandings {
        [
            ("NOR", MedalCount::new(1, 1, 0)),
            ("ITA", MedalCount::new(0, 0, 2)),
            ("KOR", MedalCount::new(3, 0, 0)),
        ]
        .into_iter()
        .collect()
    }

    #[tokio::test]
    async fn test_run_publishes_ranked_rows() {
        let publisher = RecordingPublisher::default();
        let engine = LeaderboardEngine::new(
            FixedSource(Some(standings())),
            publisher.clone(),
            roster(),
        );

        let report = engine.run().await.unwrap();
        let names: Vec<&str> = report.rows.iter().map(|r| r.record.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B", "A"]);

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert!(published[0].0.starts_with("Last Updated: "));
        assert!(published[0].0.ends_with(" UTC"));
        assert_eq!(published[0].1, report.rows);
    }

    #[tokio::test]
    async fn test_weighted_criterion() {
        let engine = LeaderboardEngine::new(
            FixedSource(Some(standings())),
            RecordingPublisher::default(),
            roster(),
        )
        .with_criterion(RankCriterion::WeightedScore);

        let rows = engine.build().await.unwrap();
        let scores: Vec<u32> = rows.iter().map(|r| r.record.weighted_score).collect();
        assert_eq!(scores, vec![9, 5, 2]);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_publish() {
        let publisher = RecordingPublisher::default();
        let engine = LeaderboardEngine::new(FixedSource(None), publisher.clone(), roster());

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::SourceUnavailable { .. }));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publish_failure_is_reported() {
        let publisher = RecordingPublisher {
            fail: true,
            ..Default::default()
        };
        let engine = LeaderboardEngine::new(FixedSource(Some(standings())), publisher, roster());

        let err = engine.run().await.unwrap_err();
        assert!(matches!(err, LeaderboardError::PublishFailure { .. }));
    }
}
