use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub const ZERO: MedalCount = MedalCount {
        gold: 0,
        silver: 0,
        bronze: 0,
    };

    pub fn new(gold: u32, silver: u32, bronze: u32) -> Self {
        Self {
            gold,
            silver,
            bronze,
        }
    }

    // Arithmetic saturates at u32::MAX; static standings skip the parser's cap.
    pub fn total(&self) -> u32 {
        self.gold
            .saturating_add(self.silver)
            .saturating_add(self.bronze)
    }

    /// 3-2-1 weighting.
    pub fn weighted(&self) -> u32 {
        self.gold
            .saturating_mul(3)
            .saturating_add(self.silver.saturating_mul(2))
            .saturating_add(self.bronze)
    }

    pub fn saturating_add(self, other: MedalCount) -> MedalCount {
        MedalCount {
            gold: self.gold.saturating_add(other.gold),
            silver: self.silver.saturating_add(other.silver),
            bronze: self.bronze.saturating_add(other.bronze),
        }
    }
}

/// Medal counts per canonical entity code for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStandings {
    counts: HashMap<String, MedalCount>,
}

impl EntityStandings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `count` for `code`. The first value seen for a code is kept;
    /// returns `false` when `code` was already present.
    pub fn insert(&mut self, code: impl Into<String>, count: MedalCount) -> bool {
        match self.counts.entry(code.into()) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(count);
                true
            }
        }
    }

    /// Counts for `code`, zero when the source never listed it.
    pub fn get_or_zero(&self, code: &str) -> MedalCount {
        self.counts.get(code).copied().unwrap_or(MedalCount::ZERO)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.counts.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MedalCount)> {
        self.counts.iter().map(|(code, count)| (code.as_str(), count))
    }
}

impl<K: Into<String>> FromIterator<(K, MedalCount)> for EntityStandings {
    fn from_iter<T: IntoIterator<Item = (K, MedalCount)>>(iter: T) -> Self {
        let mut standings = Self::new();
        for (code, count) in iter {
            standings.insert(code, count);
        }
        standings
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub entities: Vec<String>,
}

/// Draft picks per participant, in the order they were configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RosterAssignment {
    participants: Vec<Participant>,
}

impl RosterAssignment {
    pub fn new(participants: Vec<Participant>) -> Self {
        Self { participants }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.participants.iter()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl<N, E, S> FromIterator<(N, E)> for RosterAssignment
where
    N: Into<String>,
    E: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, E)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, entities)| Participant {
                    name: name.into(),
                    entities: entities.into_iter().map(Into::into).collect(),
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub name: String,
    pub total: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
    pub gold_breakdown: String,
    pub silver_breakdown: String,
    pub bronze_breakdown: String,
    pub weighted_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    #[serde(flatten)]
    pub record: ParticipantRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankCriterion {
    #[default]
    TotalMedals,
    WeightedScore,
}

impl RankCriterion {
    pub fn key(&self, record: &ParticipantRecord) -> u32 {
        match self {
            RankCriterion::TotalMedals => record.total,
            RankCriterion::WeightedScore => record.weighted_score,
        }
    }
}

impl fmt::Display for RankCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankCriterion::TotalMedals => f.write_str("total_medals"),
            RankCriterion::WeightedScore => f.write_str("weighted_score"),
        }
    }
}

impl FromStr for RankCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "total" | "total_medals" => Ok(RankCriterion::TotalMedals),
            "weighted" | "weighted_score" | "score" => Ok(RankCriterion::WeightedScore),
            other => Err(format!(
                "unknown ranking criterion '{}', expected total_medals or weighted_score",
                other
            )),
        }
    }
}
