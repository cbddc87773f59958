use std::cmp::Reverse;

use podium_types::Team;

/// Order teams by total points, highest first.
///
/// The sort is stable: teams with equal points keep their relative input
/// order. The input is left untouched.
pub fn rank(teams: &[Team]) -> Vec<Team> {
    let mut ranked = teams.to_vec();
    ranked.sort_by_key(|team| Reverse(team.total_points));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(name: &str, points: u32) -> Team {
        let mut t = Team::new(name, "");
        t.total_points = points;
        t
    }

    fn names(teams: &[Team]) -> Vec<&str> {
        teams.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn ties_keep_input_order() {
        let teams = vec![team("A", 10), team("B", 25), team("C", 10)];
        assert_eq!(names(&rank(&teams)), vec!["B", "A", "C"]);
    }

    #[test]
    fn ties_are_not_broken_by_name() {
        let teams = vec![team("Zebras", 5), team("Ants", 5)];
        assert_eq!(names(&rank(&teams)), vec!["Zebras", "Ants"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let teams = vec![team("A", 1), team("B", 2)];
        let before = teams.clone();
        let _ = rank(&teams);
        assert_eq!(teams, before);
    }

    #[test]
    fn empty_input() {
        assert!(rank(&[]).is_empty());
    }
}
