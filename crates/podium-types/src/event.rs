use serde::{Deserialize, Serialize};

use crate::id::{CategoryId, EventId, TeamId};
use crate::placement::{points_for, Placement};

/// One team's recorded placement in one event.
///
/// `points` is fixed when the result is recorded and is not recomputed if the
/// scoring rules change later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    pub team_id: TeamId,
    pub placement: Placement,
    pub points: u32,
}

impl EventResult {
    /// A result scored with the current rules.
    pub fn scored(team_id: TeamId, placement: Placement) -> Self {
        Self {
            team_id,
            placement,
            points: points_for(placement),
        }
    }
}

/// A festival event and the results recorded for it.
///
/// Holds at most one result per team.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub category: CategoryId,
    #[serde(default)]
    pub results: Vec<EventResult>,
}

impl Event {
    pub fn new(name: impl Into<String>, category: CategoryId) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            category,
            results: Vec::new(),
        }
    }

    /// The result recorded for `team`, if any.
    pub fn result_for(&self, team: &TeamId) -> Option<&EventResult> {
        self.results.iter().find(|r| &r.team_id == team)
    }

    /// Results holding the given placement.
    pub fn results_with(&self, placement: Placement) -> impl Iterator<Item = &EventResult> {
        self.results.iter().filter(move |r| r.placement == placement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scored_result_uses_rules() {
        let r = EventResult::scored(TeamId::new(), Placement::Silver);
        assert_eq!(r.points, 7);
    }

    #[test]
    fn result_lookup_by_team() {
        let a = TeamId::new();
        let b = TeamId::new();
        let mut event = Event::new("Solo", CategoryId::new());
        event.results.push(EventResult::scored(a.clone(), Placement::Gold));

        assert_eq!(event.result_for(&a).map(|r| r.placement), Some(Placement::Gold));
        assert!(event.result_for(&b).is_none());
    }

    #[test]
    fn results_with_filters_by_placement() {
        let mut event = Event::new("Relay", CategoryId::new());
        event.results.push(EventResult::scored(TeamId::new(), Placement::Gold));
        event.results.push(EventResult::scored(TeamId::new(), Placement::Bronze));
        event.results.push(EventResult::scored(TeamId::new(), Placement::Bronze));
        assert_eq!(event.results_with(Placement::Bronze).count(), 2);
        assert_eq!(event.results_with(Placement::Silver).count(), 0);
    }

    #[test]
    fn result_document_shape() {
        let team = TeamId::new();
        let json = serde_json::to_value(EventResult::scored(team.clone(), Placement::NoEntry)).unwrap();
        assert_eq!(json["teamId"], team.to_string());
        assert_eq!(json["placement"], "No Entry");
        assert_eq!(json["points"], 0);
    }
}
