use crate::core::snapshot::SnapshotLayout;
use crate::domain::model::LeaderboardRow;
use crate::domain::ports::{SnapshotPublisher, Storage};
use crate::utils::error::{LeaderboardError, Result};
use async_trait::async_trait;

pub const DEFAULT_FILENAME: &str = "leaderboard.csv";

/// Publishes the snapshot as a CSV file through a [`Storage`] backend.
pub struct CsvPublisher<S: Storage> {
    storage: S,
    filename: String,
    layout: SnapshotLayout,
}

impl<S: Storage> CsvPublisher<S> {
    pub fn new(storage: S, filename: impl Into<String>, layout: SnapshotLayout) -> Self {
        Self {
            storage,
            filename: filename.into(),
            layout,
        }
    }

    /// Whole file in memory; rows have different widths so the writer is flexible.
    pub fn render(&self, header: &str, rows: &[LeaderboardRow]) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for line in self.layout.grid(header, rows) {
            if line.is_empty() {
                writer.write_record([""])?;
            } else {
                writer.write_record(&line)?;
            }
        }
        writer
            .into_inner()
            .map_err(|e| LeaderboardError::publish_failure(format!("flushing CSV: {}", e)))
    }
}

#[async_trait]
impl<S: Storage> SnapshotPublisher for CsvPublisher<S> {
    async fn publish(&self, header: &str, rows: &[LeaderboardRow]) -> Result<()> {
        let data = self
            .render(header, rows)
            .map_err(|e| LeaderboardError::publish_failure(e.to_string()))?;

        tracing::debug!("Writing {} bytes to {}", data.len(), self.filename);
        self.storage
            .write_file(&self.filename, &data)
            .await
            .map_err(|e| {
                LeaderboardError::publish_failure(format!("writing {}: {}", self.filename, e))
            })
    }

    fn destination(&self) -> String {
        self.filename.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ParticipantRecord;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        read_only: bool,
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            if self.read_only {
                return Err(LeaderboardError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )));
            }
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn rows() -> Vec<LeaderboardRow> {
        vec![LeaderboardRow {
            rank: 1,
            record: ParticipantRecord {
                name: "Group 1".to_string(),
                total: 3,
                gold: 1,
                silver: 2,
                bronze: 0,
                gold_breakdown: "NOR: 1G | KOR: 0G".to_string(),
                silver_breakdown: "NOR: 2S | KOR: 0S".to_string(),
                bronze_breakdown: "NOR: 0B | KOR: 0B".to_string(),
                weighted_score: 7,
            },
        }]
    }

    #[tokio::test]
    async fn test_publish_writes_layout() {
        let storage = MockStorage::default();
        let publisher = CsvPublisher::new(storage.clone(), DEFAULT_FILENAME, SnapshotLayout::default());

        publisher
            .publish("Last Updated: 2026-02-15 12:00:00 UTC", &rows())
            .await
            .unwrap();

        let data = storage.files.lock().await[DEFAULT_FILENAME].clone();
        let text = String::from_utf8(data).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Last Updated: 2026-02-15 12:00:00 UTC");
        assert_eq!(lines[1], "\"\"");
        assert_eq!(
            lines[2],
            "Rank,Name,Total,Gold,Silver,Bronze,Gold Breakdown,Silver Breakdown,Bronze Breakdown"
        );
        assert_eq!(
            lines[3],
            "1,Group 1,3,1,2,0,NOR: 1G | KOR: 0G,NOR: 2S | KOR: 0S,NOR: 0B | KOR: 0B"
        );
        assert_eq!(lines.len(), 4);
    }

    #[tokio::test]
    async fn test_storage_error_becomes_publish_failure() {
        let storage = MockStorage {
            read_only: true,
            ..Default::default()
        };
        let publisher = CsvPublisher::new(storage, DEFAULT_FILENAME, SnapshotLayout::default());

        let err = publisher.publish("Last Updated: now", &rows()).await.unwrap_err();
        assert!(matches!(err, LeaderboardError::PublishFailure { .. }));
    }
}
