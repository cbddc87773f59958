use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Finishing rank of a team within one event.
///
/// The set of placements is closed. Each placement carries a fixed point
/// value (see [`points_for`]); medals are the top three placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Placement {
    Gold,
    Silver,
    Bronze,
    #[serde(rename = "Non-winner")]
    NonWinner,
    #[serde(rename = "No Entry", alias = "No-Entry")]
    NoEntry,
}

impl Placement {
    /// Every placement, best first.
    pub const ALL: [Placement; 5] = [
        Self::Gold,
        Self::Silver,
        Self::Bronze,
        Self::NonWinner,
        Self::NoEntry,
    ];

    /// The podium placements.
    pub const MEDALS: [Placement; 3] = [Self::Gold, Self::Silver, Self::Bronze];

    /// Returns `true` for Gold, Silver, and Bronze.
    pub fn is_medal(&self) -> bool {
        matches!(self, Self::Gold | Self::Silver | Self::Bronze)
    }

    /// Points awarded for this placement.
    pub fn points(&self) -> u32 {
        points_for(*self)
    }

    /// Human-readable label, identical to the persisted form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
            Self::NonWinner => "Non-winner",
            Self::NoEntry => "No Entry",
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Placement {
    type Err = TypeError;

    /// Case-insensitive; `-`, `_`, and spaces are ignored, so
    /// `"no-entry"`, `"No Entry"`, and `"NO_ENTRY"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "gold" => Ok(Self::Gold),
            "silver" => Ok(Self::Silver),
            "bronze" => Ok(Self::Bronze),
            "nonwinner" => Ok(Self::NonWinner),
            "noentry" => Ok(Self::NoEntry),
            _ => Err(TypeError::UnknownPlacement(s.to_string())),
        }
    }
}

/// Scoring rule: points awarded for a placement.
pub fn points_for(placement: Placement) -> u32 {
    match placement {
        Placement::Gold => 10,
        Placement::Silver => 7,
        Placement::Bronze => 5,
        Placement::NonWinner => 1,
        Placement::NoEntry => 0,
    }
}

/// Scoring rule over a raw label. Unrecognized labels score 0.
pub fn points_for_label(label: &str) -> u32 {
    label.parse::<Placement>().map(points_for).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_point_values() {
        assert_eq!(points_for(Placement::Gold), 10);
        assert_eq!(points_for(Placement::Silver), 7);
        assert_eq!(points_for(Placement::Bronze), 5);
        assert_eq!(points_for(Placement::NonWinner), 1);
        assert_eq!(points_for(Placement::NoEntry), 0);
    }

    #[test]
    fn unknown_label_scores_zero() {
        assert_eq!(points_for_label("Platinum"), 0);
        assert_eq!(points_for_label(""), 0);
        assert_eq!(points_for_label("silver"), 7);
    }

    #[test]
    fn parse_is_lenient_about_case_and_separators() {
        assert_eq!("GOLD".parse::<Placement>().unwrap(), Placement::Gold);
        assert_eq!("non-winner".parse::<Placement>().unwrap(), Placement::NonWinner);
        assert_eq!("No Entry".parse::<Placement>().unwrap(), Placement::NoEntry);
        assert_eq!("no_entry".parse::<Placement>().unwrap(), Placement::NoEntry);
        assert!("fourth".parse::<Placement>().is_err());
    }

    #[test]
    fn medals_are_top_three() {
        let medals: Vec<_> = Placement::ALL.into_iter().filter(Placement::is_medal).collect();
        assert_eq!(medals, Placement::MEDALS.to_vec());
    }

    #[test]
    fn persisted_labels() {
        assert_eq!(
            serde_json::to_string(&Placement::NonWinner).unwrap(),
            "\"Non-winner\""
        );
        assert_eq!(
            serde_json::to_string(&Placement::NoEntry).unwrap(),
            "\"No Entry\""
        );
        let alias: Placement = serde_json::from_str("\"No-Entry\"").unwrap();
        assert_eq!(alias, Placement::NoEntry);
    }

    #[test]
    fn display_matches_label() {
        for placement in Placement::ALL {
            assert_eq!(placement.to_string(), placement.label());
        }
    }
}
