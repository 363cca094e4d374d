use crate::domain::model::{LeaderboardRow, ParticipantRecord, RankCriterion};

/// Orders records by `criterion`, highest first.
///
/// The sort is stable, so participants level on the criterion keep their
/// roster order. Every row gets its own rank, 1..=n, ties included.
pub fn rank(records: Vec<ParticipantRecord>, criterion: RankCriterion) -> Vec<LeaderboardRow> {
    let mut records = records;
    records.sort_by(|a, b| criterion.key(b).cmp(&criterion.key(a)));

    records
        .into_iter()
        .zip(1u32..)
        .map(|(record, rank)| LeaderboardRow { rank, record })
        .collect()
}
