//! Scoring rulesets stored on leagues and on standalone in-game scoring
//! records.
//!
//! The JSON shape is
//! `{"goals": {"<position>": int}, "assists": int, "clean_sheets": {"<position>": int}, "yellow_cards": int, "red_cards": int}`.
//! Every field is optional. Position keys accept any spelling that
//! [`PlayerPosition`] parses ("forward", "FWD", ...).

use std::collections::BTreeMap;
use std::fmt;

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

use crate::entities::position::PlayerPosition;

/// The kinds of in-game events a ruleset assigns points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringEvent {
    Goal,
    Assist,
    CleanSheet,
    YellowCard,
    RedCard,
}

impl ScoringEvent {
    pub const ALL: [ScoringEvent; 5] = [
        ScoringEvent::Goal,
        ScoringEvent::Assist,
        ScoringEvent::CleanSheet,
        ScoringEvent::YellowCard,
        ScoringEvent::RedCard,
    ];
}

impl fmt::Display for ScoringEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScoringEvent::Goal => "goals",
            ScoringEvent::Assist => "assists",
            ScoringEvent::CleanSheet => "clean_sheets",
            ScoringEvent::YellowCard => "yellow_cards",
            ScoringEvent::RedCard => "red_cards",
        };
        f.write_str(name)
    }
}

/// Point values for each scoring event.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(deny_unknown_fields)]
pub struct ScoringRules {
    /// Points per goal, by the scorer's position.
    #[serde(default)]
    pub goals: BTreeMap<PlayerPosition, i32>,
    /// Points per assist, for every position.
    #[serde(default)]
    pub assists: i32,
    /// Points for keeping a clean sheet, by position.
    #[serde(default)]
    pub clean_sheets: BTreeMap<PlayerPosition, i32>,
    #[serde(default)]
    pub yellow_cards: i32,
    #[serde(default)]
    pub red_cards: i32,
}

impl ScoringRules {
    /// The ruleset from the league setup guide; used when a league is
    /// created without one.
    pub fn standard() -> Self {
        Self {
            goals: BTreeMap::from([
                (PlayerPosition::Forward, 1),
                (PlayerPosition::Midfielder, 2),
                (PlayerPosition::Defender, 3),
            ]),
            assists: 1,
            clean_sheets: BTreeMap::from([
                (PlayerPosition::Goalkeeper, 3),
                (PlayerPosition::Defender, 2),
            ]),
            yellow_cards: -1,
            red_cards: -3,
        }
    }

    /// Points a single occurrence of `event` is worth for a player at
    /// `position`. Missing rules are worth zero.
    pub fn points_for(&self, event: ScoringEvent, position: PlayerPosition) -> i32 {
        match event {
            ScoringEvent::Goal => self.goals.get(&position).copied().unwrap_or(0),
            ScoringEvent::CleanSheet => self.clean_sheets.get(&position).copied().unwrap_or(0),
            ScoringEvent::Assist => self.assists,
            ScoringEvent::YellowCard => self.yellow_cards,
            ScoringEvent::RedCard => self.red_cards,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_documented_shape() {
        let rules: ScoringRules = serde_json::from_value(json!({
            "goals": {"forward": 1, "midfielder": 2, "defender": 3},
            "assists": 1,
            "clean_sheets": {"goalkeeper": 3, "defender": 2},
            "yellow_cards": -1,
            "red_cards": -3
        }))
        .unwrap();

        assert_eq!(rules, ScoringRules::standard());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let rules: ScoringRules = serde_json::from_value(json!({"assists": 2})).unwrap();

        assert_eq!(rules.points_for(ScoringEvent::Assist, PlayerPosition::Forward), 2);
        assert_eq!(rules.points_for(ScoringEvent::Goal, PlayerPosition::Forward), 0);
        assert_eq!(rules.points_for(ScoringEvent::RedCard, PlayerPosition::Defender), 0);
    }

    #[test]
    fn test_points_for_missing_position_is_zero() {
        let rules = ScoringRules::standard();

        assert_eq!(rules.points_for(ScoringEvent::Goal, PlayerPosition::Defender), 3);
        assert_eq!(rules.points_for(ScoringEvent::Goal, PlayerPosition::Goalkeeper), 0);
        assert_eq!(rules.points_for(ScoringEvent::CleanSheet, PlayerPosition::Forward), 0);
        assert_eq!(rules.points_for(ScoringEvent::YellowCard, PlayerPosition::Forward), -1);
    }

    #[test]
    fn test_rejects_unknown_keys_and_positions() {
        assert!(serde_json::from_value::<ScoringRules>(json!({"own_goals": -2})).is_err());
        assert!(serde_json::from_value::<ScoringRules>(json!({"goals": {"striker": 4}})).is_err());
    }

    #[test]
    fn test_serializes_canonical_position_keys() {
        let value = serde_json::to_value(ScoringRules::standard()).unwrap();
        assert_eq!(value["goals"]["Forward"], 1);
        assert_eq!(value["clean_sheets"]["Goalkeeper"], 3);
    }
}
