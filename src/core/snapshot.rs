//! Row layout of a published leaderboard.
//!
//! A snapshot is a grid of cells: the "Last Updated" line, a blank separator,
//! the column header and one line per ranked participant. Sinks only decide
//! how to store the grid.

use crate::domain::model::LeaderboardRow;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};

pub const COLUMNS: [&str; 9] = [
    "Rank",
    "Name",
    "Total",
    "Gold",
    "Silver",
    "Bronze",
    "Gold Breakdown",
    "Silver Breakdown",
    "Bronze Breakdown",
];

pub const SCORE_COLUMN: &str = "Score";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotLayout {
    pub include_score: bool,
}

impl SnapshotLayout {
    pub fn header_row(&self) -> Vec<String> {
        let mut row: Vec<String> = COLUMNS.iter().map(|c| c.to_string()).collect();
        if self.include_score {
            row.push(SCORE_COLUMN.to_string());
        }
        row
    }

    pub fn data_row(&self, row: &LeaderboardRow) -> Vec<String> {
        let r = &row.record;
        let mut cells = vec![
            row.rank.to_string(),
            r.name.clone(),
            r.total.to_string(),
            r.gold.to_string(),
            r.silver.to_string(),
            r.bronze.to_string(),
            r.gold_breakdown.clone(),
            r.silver_breakdown.clone(),
            r.bronze_breakdown.clone(),
        ];
        if self.include_score {
            cells.push(r.weighted_score.to_string());
        }
        cells
    }

    /// Full grid in publish order.
    pub fn grid(&self, header: &str, rows: &[LeaderboardRow]) -> Vec<Vec<String>> {
        let mut grid = Vec::with_capacity(rows.len() + 3);
        grid.push(vec![header.to_string()]);
        grid.push(Vec::new());
        grid.push(self.header_row());
        grid.extend(rows.iter().map(|row| self.data_row(row)));
        grid
    }
}

/// Timestamp text shared by the header line and the success log.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>, zone_label: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} {}", at.format("%Y-%m-%d %H:%M:%S"), zone_label)
}

pub fn header_line(timestamp: &str) -> String {
    format!("Last Updated: {}", timestamp)
}

/// Publish clock with an optional fixed UTC offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishClock {
    pub utc_offset_minutes: Option<i32>,
}

impl PublishClock {
    pub fn timestamp_at(&self, now: DateTime<Utc>) -> String {
        match self
            .utc_offset_minutes
            .and_then(|minutes| FixedOffset::east_opt(minutes * 60))
        {
            Some(offset) => {
                let local = now.with_timezone(&offset);
                format_timestamp(&local, &format!("UTC{}", offset))
            }
            None => format_timestamp(&now, "UTC"),
        }
    }

    pub fn now(&self) -> String {
        self.timestamp_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ParticipantRecord;

    fn row() -> LeaderboardRow {
        LeaderboardRow {
            rank: 1,
            record: ParticipantRecord {
                name: "Group 1".to_string(),
                total: 33,
                gold: 13,
                silver: 9,
                bronze: 11,
                gold_breakdown: "NOR: 12G | KOR: 1G".to_string(),
                silver_breakdown: "NOR: 7S | KOR: 2S".to_string(),
                bronze_breakdown: "NOR: 8B | KOR: 3B".to_string(),
                weighted_score: 68,
            },
        }
    }

    #[test]
    fn test_grid_layout() {
        let grid = SnapshotLayout::default().grid("Last Updated: now", &[row()]);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0], vec!["Last Updated: now"]);
        assert!(grid[1].is_empty());
        assert_eq!(grid[2], COLUMNS.to_vec());
        assert_eq!(
            grid[3],
            vec![
                "1",
                "Group 1",
                "33",
                "13",
                "9",
                "11",
                "NOR: 12G | KOR: 1G",
                "NOR: 7S | KOR: 2S",
                "NOR: 8B | KOR: 3B"
            ]
        );
    }

    #[test]
    fn test_score_column_is_optional() {
        let layout = SnapshotLayout {
            include_score: true,
        };
        assert_eq!(layout.header_row().last().unwrap(), SCORE_COLUMN);
        assert_eq!(layout.data_row(&row()).last().unwrap(), "68");
        assert_eq!(layout.data_row(&row()).len(), 10);
    }

    #[test]
    fn test_timestamp_with_offset() {
        let now = Utc.with_ymd_and_hms(2026, 2, 15, 18, 30, 0).unwrap();
        assert_eq!(
            PublishClock::default().timestamp_at(now),
            "2026-02-15 18:30:00 UTC"
        );
        let cet = PublishClock {
            utc_offset_minutes: Some(60),
        };
        assert_eq!(cet.timestamp_at(now), "2026-02-15 19:30:00 UTC+01:00");
        assert_eq!(
            header_line(&cet.timestamp_at(now)),
            "Last Updated: 2026-02-15 19:30:00 UTC+01:00"
        );
    }
}
