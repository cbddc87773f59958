use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::id::TeamId;
use crate::team::Team;

/// The publicly visible copy of the standings.
///
/// Owns deep copies of teams and events taken at publish time; later edits
/// to the live ledger never reach it. Replaced wholesale on every publish.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedScores {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl PublishedScores {
    pub fn new(teams: Vec<Team>, events: Vec<Event>, last_updated: DateTime<Utc>) -> Self {
        Self {
            teams,
            events,
            last_updated: Some(last_updated),
        }
    }

    /// Returns `true` if nothing has been published yet.
    pub fn is_unpublished(&self) -> bool {
        self.last_updated.is_none()
    }

    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unpublished() {
        let published = PublishedScores::default();
        assert!(published.is_unpublished());
        assert!(published.teams.is_empty());
    }

    #[test]
    fn document_roundtrip_keeps_timestamp() {
        let team = Team::new("Lions", "");
        let published = PublishedScores::new(vec![team.clone()], vec![], Utc::now());
        let json = serde_json::to_string(&published).unwrap();
        assert!(json.contains("lastUpdated"));

        let parsed: PublishedScores = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, published);
        assert_eq!(parsed.team(&team.id).map(|t| t.name.as_str()), Some("Lions"));
    }

    #[test]
    fn empty_document_parses_to_default() {
        let parsed: PublishedScores = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, PublishedScores::default());
    }
}
