use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use podium_types::{Category, CategoryId, Event, EventId, Placement, PublishedScores, Team, TeamId};

const UNKNOWN_TEAM: &str = "Unknown Team";
const UNKNOWN_CATEGORY: &str = "Unknown Category";

/// Headline numbers for the administrative dashboard.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoreboardSummary {
    pub team_count: usize,
    pub event_count: usize,
    pub category_count: usize,
    /// Gold, Silver, and Bronze results across all events.
    pub medals_awarded: usize,
    pub last_published: Option<DateTime<Utc>>,
    pub unpublished_changes: bool,
}

/// One awarded placement, resolved to display names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MedalBoardEntry {
    pub event_id: EventId,
    pub event_name: String,
    pub category_name: String,
    pub team_id: TeamId,
    pub team_name: String,
}

/// Every holder of one placement, in event order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MedalBoard {
    pub placement: Placement,
    pub entries: Vec<MedalBoardEntry>,
}

/// A placement holder on one event's podium.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PodiumPlace {
    pub placement: Placement,
    pub team_id: TeamId,
    pub team_name: String,
}

/// An event with its Gold, Silver, and Bronze holders.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EventPodium {
    pub event_id: EventId,
    pub event_name: String,
    /// All recorded results, podium or not.
    pub result_count: usize,
    pub places: Vec<PodiumPlace>,
}

/// Deterministic projection builders over ledger data.
pub struct ProjectionBuilder;

impl ProjectionBuilder {
    pub fn summary(
        teams: &[Team],
        events: &[Event],
        categories: &[Category],
        published: &PublishedScores,
    ) -> ScoreboardSummary {
        let medals_awarded = events
            .iter()
            .flat_map(|e| &e.results)
            .filter(|r| r.placement.is_medal())
            .count();

        ScoreboardSummary {
            team_count: teams.len(),
            event_count: events.len(),
            category_count: categories.len(),
            medals_awarded,
            last_published: published.last_updated,
            unpublished_changes: has_unpublished_changes(teams, events, published),
        }
    }

    pub fn medal_board(
        placement: Placement,
        teams: &[Team],
        events: &[Event],
        categories: &[Category],
    ) -> MedalBoard {
        let team_names: HashMap<&TeamId, &str> =
            teams.iter().map(|t| (&t.id, t.name.as_str())).collect();
        let category_names: HashMap<&CategoryId, &str> =
            categories.iter().map(|c| (&c.id, c.name.as_str())).collect();

        let team_names = &team_names;
        let category_names = &category_names;
        let entries = events
            .iter()
            .flat_map(move |event| {
                let category_name = category_names
                    .get(&event.category)
                    .copied()
                    .unwrap_or(UNKNOWN_CATEGORY);
                event.results_with(placement).map(move |result| MedalBoardEntry {
                    event_id: event.id.clone(),
                    event_name: event.name.clone(),
                    category_name: category_name.to_string(),
                    team_id: result.team_id.clone(),
                    team_name: team_names
                        .get(&result.team_id)
                        .copied()
                        .unwrap_or(UNKNOWN_TEAM)
                        .to_string(),
                })
            })
            .collect();

        MedalBoard { placement, entries }
    }

    /// One entry per event, in event order. Each medal lists the first team
    /// recorded with it; results for teams not in `teams` are skipped.
    pub fn podiums(teams: &[Team], events: &[Event]) -> Vec<EventPodium> {
        let teams_by_id: HashMap<&TeamId, &Team> = teams.iter().map(|t| (&t.id, t)).collect();

        events
            .iter()
            .map(|event| {
                let places = Placement::MEDALS
                    .into_iter()
                    .filter_map(|placement| {
                        let result = event.results_with(placement).next()?;
                        let team = teams_by_id.get(&result.team_id)?;
                        Some(PodiumPlace {
                            placement,
                            team_id: team.id.clone(),
                            team_name: team.name.clone(),
                        })
                    })
                    .collect();
                EventPodium {
                    event_id: event.id.clone(),
                    event_name: event.name.clone(),
                    result_count: event.results.len(),
                    places,
                }
            })
            .collect()
    }
}

/// Whether the live ledger has drifted from the published snapshot.
///
/// This is a cheap heuristic, not a deep comparison: it looks at entity
/// counts, team point totals, and per-event result counts.
pub fn has_unpublished_changes(
    teams: &[Team],
    events: &[Event],
    published: &PublishedScores,
) -> bool {
    if published.teams.is_empty() && published.events.is_empty() {
        return !teams.is_empty() || !events.is_empty();
    }
    if teams.len() != published.teams.len() || events.len() != published.events.len() {
        return true;
    }

    let published_points: HashMap<&TeamId, u32> = published
        .teams
        .iter()
        .map(|t| (&t.id, t.total_points))
        .collect();
    if teams
        .iter()
        .any(|t| published_points.get(&t.id) != Some(&t.total_points))
    {
        return true;
    }

    let published_results: HashMap<&EventId, usize> = published
        .events
        .iter()
        .map(|e| (&e.id, e.results.len()))
        .collect();
    events
        .iter()
        .any(|e| published_results.get(&e.id) != Some(&e.results.len()))
}
