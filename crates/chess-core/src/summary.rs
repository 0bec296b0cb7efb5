use std::collections::BTreeMap;

use crate::classify::{ClassifiedGame, Outcome};

pub const HOURS_PER_DAY: usize = 24;

/// Per-hour and per-outcome counts for one player's day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    hourly: [u32; HOURS_PER_DAY],
    outcomes: BTreeMap<Outcome, u32>,
}

impl DailySummary {
    pub fn from_games(games: &[ClassifiedGame]) -> Self {
        let mut hourly = [0u32; HOURS_PER_DAY];
        let mut outcomes = BTreeMap::new();

        for game in games {
            if let Some(bucket) = hourly.get_mut(game.hour as usize) {
                *bucket += 1;
            }
            *outcomes.entry(game.outcome).or_insert(0) += 1;
        }

        Self { hourly, outcomes }
    }

    pub fn total_games(&self) -> u32 {
        self.outcomes.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_games() == 0
    }

    /// All 24 `(hour, count)` pairs, zero-filled.
    pub fn hourly(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.hourly.iter().enumerate().map(|(hour, count)| (hour as u32, *count))
    }

    pub fn busiest_hour_count(&self) -> u32 {
        self.hourly.iter().copied().max().unwrap_or(0)
    }

    pub fn outcome_count(&self, outcome: Outcome) -> u32 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    /// Outcomes that occurred, most frequent first.
    pub fn outcome_breakdown(&self) -> Vec<(Outcome, u32)> {
        let mut breakdown: Vec<(Outcome, u32)> = Outcome::ALL
            .iter()
            .map(|o| (*o, self.outcome_count(*o)))
            .filter(|(_, count)| *count > 0)
            .collect();
        // Stable sort keeps Win, Loss, Draw, Other order on ties
        breakdown.sort_by(|a, b| b.1.cmp(&a.1));
        breakdown
    }
}
