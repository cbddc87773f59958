use serde::{Deserialize, Serialize};

use crate::placement::Placement;

/// Per-placement result counts for one team.
///
/// Persisted as an object keyed by placement label, e.g.
/// `{"Gold": 1, "Silver": 0, "Bronze": 2, "Non-winner": 0, "No Entry": 0}`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MedalTally {
    #[serde(rename = "Gold", default)]
    pub gold: u32,
    #[serde(rename = "Silver", default)]
    pub silver: u32,
    #[serde(rename = "Bronze", default)]
    pub bronze: u32,
    #[serde(rename = "Non-winner", default)]
    pub non_winner: u32,
    #[serde(rename = "No Entry", alias = "No-Entry", default)]
    pub no_entry: u32,
}

impl MedalTally {
    /// Count for a single placement.
    pub fn get(&self, placement: Placement) -> u32 {
        match placement {
            Placement::Gold => self.gold,
            Placement::Silver => self.silver,
            Placement::Bronze => self.bronze,
            Placement::NonWinner => self.non_winner,
            Placement::NoEntry => self.no_entry,
        }
    }

    fn slot(&mut self, placement: Placement) -> &mut u32 {
        match placement {
            Placement::Gold => &mut self.gold,
            Placement::Silver => &mut self.silver,
            Placement::Bronze => &mut self.bronze,
            Placement::NonWinner => &mut self.non_winner,
            Placement::NoEntry => &mut self.no_entry,
        }
    }

    /// Count one more result with `placement`.
    pub fn record(&mut self, placement: Placement) {
        let slot = self.slot(placement);
        *slot = slot.saturating_add(1);
    }

    /// Count one fewer result with `placement`. Saturates at zero.
    pub fn retract(&mut self, placement: Placement) {
        let slot = self.slot(placement);
        *slot = slot.saturating_sub(1);
    }

    /// Gold + Silver + Bronze.
    pub fn medal_count(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }

    /// Total number of results across all placements.
    pub fn result_count(&self) -> u32 {
        Placement::ALL.iter().map(|p| self.get(*p)).sum()
    }
}
