use crate::domain::model::{EntityStandings, MedalCount, ParticipantRecord, RosterAssignment};

pub const BREAKDOWN_DELIMITER: &str = " | ";

/// Per-participant totals, in roster order. Entities missing from the
/// standings count as zero and still show up in the breakdowns.
pub fn aggregate(roster: &RosterAssignment, standings: &EntityStandings) -> Vec<ParticipantRecord> {
    roster
        .iter()
        .map(|participant| {
            let mut sum = MedalCount::ZERO;
            let mut gold = Vec::with_capacity(participant.entities.len());
            let mut silver = Vec::with_capacity(participant.entities.len());
            let mut bronze = Vec::with_capacity(participant.entities.len());

            for code in &participant.entities {
                if !standings.contains(code) {
                    tracing::debug!("{} has no standings for {}, counting zero", participant.name, code);
                }
                let count = standings.get_or_zero(code);
                sum = sum.saturating_add(count);
                gold.push(format!("{}: {}G", code, count.gold));
                silver.push(format!("{}: {}S", code, count.silver));
                bronze.push(format!("{}: {}B", code, count.bronze));
            }

            ParticipantRecord {
                name: participant.name.clone(),
                total: sum.total(),
                gold: sum.gold,
                silver: sum.silver,
                bronze: sum.bronze,
                gold_breakdown: gold.join(BREAKDOWN_DELIMITER),
                silver_breakdown: silver.join(BREAKDOWN_DELIMITER),
                bronze_breakdown: bronze.join(BREAKDOWN_DELIMITER),
                weighted_score: sum.weighted(),
            }
        })
        .collect()
}
