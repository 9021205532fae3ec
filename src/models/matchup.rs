//! Weekly matchup and playoff bracket models

use std::collections::HashMap;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::models::{null_as_default, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Teams sharing a matchup_id face each other; `None` on bye
    #[serde(default)]
    pub matchup_id: Option<u32>,
    pub roster_id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub points: f64,
    #[serde(default)]
    pub custom_points: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters_points: Vec<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players_points: HashMap<String, f64>,
}

impl Matchup {
    /// Score that counts, honouring commissioner overrides.
    pub fn effective_points(&self) -> f64 {
        self.custom_points.unwrap_or(self.points)
    }
}

impl Payload for Matchup {
    fn validate(&self) -> Result<(), String> {
        if self.roster_id == 0 {
            return Err("roster_id must be at least 1".to_string());
        }
        if !self.points.is_finite() {
            return Err(format!("roster {} has non-finite points", self.roster_id));
        }
        Ok(())
    }
}

// == Week Matchups ==
/// All matchups of one league week. An empty week is reported as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekMatchups(pub Vec<Matchup>);

impl WeekMatchups {
    /// Entries grouped by matchup id, byes excluded.
    pub fn pairings(&self) -> HashMap<u32, Vec<&Matchup>> {
        let mut pairs: HashMap<u32, Vec<&Matchup>> = HashMap::new();
        for m in &self.0 {
            if let Some(id) = m.matchup_id {
                pairs.entry(id).or_default().push(m);
            }
        }
        pairs
    }

    pub fn for_roster(&self, roster_id: u32) -> Option<&Matchup> {
        self.0.iter().find(|m| m.roster_id == roster_id)
    }
}

impl Deref for WeekMatchups {
    type Target = [Matchup];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Payload for WeekMatchups {
    fn validate(&self) -> Result<(), String> {
        self.0.validate()
    }

    fn is_absent(&self) -> bool {
        self.0.is_empty()
    }
}

// == Bracket ==
/// One playoff bracket game. Sleeper abbreviates the field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BracketMatchup {
    #[serde(rename = "r")]
    pub round: u32,
    #[serde(rename = "m")]
    pub match_id: u32,
    #[serde(rename = "t1", default)]
    pub team_one: Option<u32>,
    #[serde(rename = "t2", default)]
    pub team_two: Option<u32>,
    #[serde(rename = "w", default)]
    pub winner: Option<u32>,
    #[serde(rename = "l", default)]
    pub loser: Option<u32>,
    /// Final placement this game decides, when it decides one
    #[serde(rename = "p", default)]
    pub placement: Option<u32>,
}

impl Payload for BracketMatchup {
    fn validate(&self) -> Result<(), String> {
        if self.round == 0 {
            return Err(format!("bracket match {} has round 0", self.match_id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: &str = r#"[
        {"matchup_id": 1, "roster_id": 1, "points": 101.5, "players": ["a","b"], "starters": ["a"]},
        {"matchup_id": 1, "roster_id": 2, "points": 88.2, "custom_points": 90.0},
        {"matchup_id": null, "roster_id": 3, "points": 0, "players": null}
    ]"#;

    #[test]
    fn test_week_decodes_and_pairs() {
        let week: WeekMatchups = serde_json::from_str(WEEK).unwrap();
        assert_eq!(week.len(), 3);
        assert!(week.validate().is_ok());
        assert!(!week.is_absent());

        let pairs = week.pairings();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[&1].len(), 2);
        assert_eq!(week.for_roster(2).unwrap().effective_points(), 90.0);
    }

    #[test]
    fn test_empty_week_is_absent() {
        let week: WeekMatchups = serde_json::from_str("[]").unwrap();
        assert!(week.is_absent());
        assert!(WeekMatchups::from_null().is_none());
    }

    #[test]
    fn test_bracket_decodes_short_names() {
        let games: Vec<BracketMatchup> =
            serde_json::from_str(r#"[{"r":1,"m":1,"t1":3,"t2":6,"w":3,"l":6},{"r":2,"m":3,"t1":null,"t2":1,"p":1}]"#)
                .unwrap();
        assert_eq!(games[0].winner, Some(3));
        assert_eq!(games[1].placement, Some(1));
        assert!(games.validate().is_ok());
    }
}
