use serde::{Deserialize, Serialize};

use crate::id::{CategoryId, TeamId};
use crate::medals::MedalTally;

/// A competing team and its running standing.
///
/// `total_points` and `medals` are aggregates over every result that
/// references this team; only the ledger mutates them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Opaque logo reference (URL or encoded image); never inspected.
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub total_points: u32,
    #[serde(default)]
    pub medals: MedalTally,
}

impl Team {
    /// A fresh team with zero points and an empty tally.
    pub fn new(name: impl Into<String>, logo: impl Into<String>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            logo: logo.into(),
            total_points: 0,
            medals: MedalTally::default(),
        }
    }
}

/// A grouping of events (e.g. "Dance", "Music").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(),
            name: name.into(),
        }
    }
}
