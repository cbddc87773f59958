use std::collections::{HashMap, HashSet};

use podium_types::{Event, EventId, MedalTally, Placement, Team, TeamId};

/// Points and medals a team should hold according to the recorded results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpectedTally {
    pub total_points: u32,
    pub medals: MedalTally,
}

/// Aggregate every result across `events` into per-team tallies.
pub fn expected_tallies<'a>(
    events: impl IntoIterator<Item = &'a Event>,
) -> HashMap<TeamId, ExpectedTally> {
    let mut tallies: HashMap<TeamId, ExpectedTally> = HashMap::new();
    for event in events {
        for result in &event.results {
            let tally = tallies.entry(result.team_id.clone()).or_default();
            tally.total_points = tally.total_points.saturating_add(result.points);
            tally.medals.record(result.placement);
        }
    }
    tallies
}

/// Result of checking team tallies against recorded results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyReport {
    pub teams_checked: usize,
    pub results_checked: usize,
    pub violations: Vec<TallyViolation>,
}

impl TallyReport {
    /// Returns `true` if all checks passed.
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// A specific inconsistency detected during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TallyViolation {
    pub team: TeamId,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    TotalPoints,
    MedalCount(Placement),
    DuplicateResult(EventId),
    OrphanResult(EventId),
}

/// Checks that every team's totals match the results that reference it.
pub struct TallyValidator;

impl TallyValidator {
    pub fn validate(teams: &[Team], events: &[Event]) -> TallyReport {
        let mut violations = Vec::new();
        let known: HashSet<&TeamId> = teams.iter().map(|t| &t.id).collect();
        let mut results_checked = 0;

        for event in events {
            let mut seen = HashSet::new();
            for result in &event.results {
                results_checked += 1;
                if !seen.insert(&result.team_id) {
                    violations.push(TallyViolation {
                        team: result.team_id.clone(),
                        kind: ViolationKind::DuplicateResult(event.id.clone()),
                        description: format!("more than one result in event {}", event.name),
                    });
                }
                if !known.contains(&result.team_id) {
                    violations.push(TallyViolation {
                        team: result.team_id.clone(),
                        kind: ViolationKind::OrphanResult(event.id.clone()),
                        description: format!("result in event {} for unknown team", event.name),
                    });
                }
            }
        }

        let expected = expected_tallies(events);
        for team in teams {
            let want = expected.get(&team.id).copied().unwrap_or_default();
            if team.total_points != want.total_points {
                violations.push(TallyViolation {
                    team: team.id.clone(),
                    kind: ViolationKind::TotalPoints,
                    description: format!(
                        "{} holds {} points, results sum to {}",
                        team.name, team.total_points, want.total_points
                    ),
                });
            }
            for placement in Placement::ALL {
                let (have, should) = (team.medals.get(placement), want.medals.get(placement));
                if have != should {
                    violations.push(TallyViolation {
                        team: team.id.clone(),
                        kind: ViolationKind::MedalCount(placement),
                        description: format!(
                            "{} holds {have} {placement}, results count {should}",
                            team.name
                        ),
                    });
                }
            }
        }

        TallyReport {
            teams_checked: teams.len(),
            results_checked,
            violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use podium_types::{CategoryId, EventResult};

    use super::*;

    fn fixture() -> (Vec<Team>, Vec<Event>) {
        let mut a = Team::new("A", "");
        let mut b = Team::new("B", "");
        let mut solo = Event::new("Solo", CategoryId::new());
        solo.results.push(EventResult::scored(a.id.clone(), Placement::Gold));
        solo.results.push(EventResult::scored(b.id.clone(), Placement::Bronze));
        let mut duet = Event::new("Duet", CategoryId::new());
        duet.results.push(EventResult::scored(a.id.clone(), Placement::Silver));

        a.total_points = 17;
        a.medals.record(Placement::Gold);
        a.medals.record(Placement::Silver);
        b.total_points = 5;
        b.medals.record(Placement::Bronze);
        (vec![a, b], vec![solo, duet])
    }

    #[test]
    fn consistent_ledger_has_no_violations() {
        let (teams, events) = fixture();
        let report = TallyValidator::validate(&teams, &events);
        assert!(report.is_consistent(), "{:?}", report.violations);
        assert_eq!(report.teams_checked, 2);
        assert_eq!(report.results_checked, 3);
    }

    #[test]
    fn expected_tallies_sum_recorded_points() {
        let (teams, events) = fixture();
        let tallies = expected_tallies(&events);
        assert_eq!(tallies[&teams[0].id].total_points, 17);
        assert_eq!(tallies[&teams[0].id].medals.get(Placement::Gold), 1);
        assert_eq!(tallies[&teams[1].id].medals.get(Placement::Bronze), 1);
    }

    #[test]
    fn recorded_points_win_over_current_rules() {
        let (teams, mut events) = fixture();
        events[0].results[0].points = 12;
        let tallies = expected_tallies(&events);
        assert_eq!(tallies[&teams[0].id].total_points, 19);
    }

    #[test]
    fn detects_point_and_medal_drift() {
        let (mut teams, events) = fixture();
        teams[0].total_points += 3;
        teams[1].medals.record(Placement::Gold);

        let report = TallyValidator::validate(&teams, &events);
        assert_eq!(report.violations.len(), 2);
        assert_eq!(report.violations[0].kind, ViolationKind::TotalPoints);
        assert_eq!(
            report.violations[1].kind,
            ViolationKind::MedalCount(Placement::Gold)
        );
    }

    #[test]
    fn detects_duplicate_and_orphan_results() {
        let (teams, mut events) = fixture();
        let a = teams[0].id.clone();
        let ghost = TeamId::new();
        events[1].results.push(EventResult::scored(a, Placement::NoEntry));
        events[1].results.push(EventResult::scored(ghost, Placement::Gold));

        let report = TallyValidator::validate(&teams, &events);
        let kinds: Vec<_> = report.violations.iter().map(|v| v.kind.clone()).collect();
        assert!(kinds.contains(&ViolationKind::DuplicateResult(events[1].id.clone())));
        assert!(kinds.contains(&ViolationKind::OrphanResult(events[1].id.clone())));
    }
}
