//! League, user and roster models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{null_as_default, require_non_empty, require_season, Payload};

/// League settings subset the client relies on
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSettings {
    #[serde(default)]
    pub num_teams: u32,
    #[serde(default)]
    pub playoff_teams: Option<u32>,
    /// First playoff week; regular season ends the week before
    #[serde(default)]
    pub playoff_week_start: Option<u32>,
    /// Last week the league scored
    #[serde(default)]
    pub last_scored_leg: Option<u32>,
    #[serde(default)]
    pub waiver_type: Option<u32>,
    #[serde(default)]
    pub reserve_slots: Option<u32>,
    #[serde(default)]
    pub taxi_slots: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct League {
    pub league_id: String,
    pub name: String,
    pub season: String,
    #[serde(default)]
    pub season_type: Option<String>,
    pub status: String,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub total_rosters: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: LeagueSettings,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scoring_settings: HashMap<String, f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub roster_positions: Vec<String>,
    #[serde(default)]
    pub draft_id: Option<String>,
    #[serde(default)]
    pub previous_league_id: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl League {
    /// Last week that can carry matchups for this league, if the settings say.
    pub fn final_week(&self) -> Option<u32> {
        // Four playoff rounds at most
        self.settings.playoff_week_start.map(|start| start.saturating_add(3))
    }
}

impl Payload for League {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("league_id", &self.league_id)?;
        require_season(&self.season)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub is_owner: Option<bool>,
}

impl User {
    /// Team name from league metadata, falling back to the display name.
    pub fn team_name(&self) -> Option<&str> {
        self.metadata
            .get("team_name")
            .and_then(|v| v.as_str())
            .or(self.display_name.as_deref())
    }
}

impl Payload for User {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("user_id", &self.user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub fpts: f64,
    #[serde(default)]
    pub fpts_decimal: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    /// Absent for orphaned teams
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub league_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub players: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub starters: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reserve: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub taxi: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub settings: RosterSettings,
}

impl Payload for Roster {
    fn validate(&self) -> Result<(), String> {
        if self.roster_id == 0 {
            return Err("roster_id must be at least 1".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEAGUE: &str = r#"{
        "league_id": "289646328504385536",
        "name": "Dynasty",
        "season": "2024",
        "status": "in_season",
        "sport": "nfl",
        "total_rosters": 12,
        "settings": {"num_teams": 12, "playoff_week_start": 15},
        "scoring_settings": {"rec": 1.0, "pass_td": 4},
        "roster_positions": ["QB", "RB", "WR", "BN"],
        "draft_id": null
    }"#;

    #[test]
    fn test_league_decodes_and_validates() {
        let league: League = serde_json::from_str(LEAGUE).unwrap();
        assert_eq!(league.settings.num_teams, 12);
        assert_eq!(league.scoring_settings["pass_td"], 4.0);
        assert_eq!(league.final_week(), Some(18));
        assert!(league.validate().is_ok());
    }

    #[test]
    fn test_final_week_saturates_on_absurd_playoff_start() {
        let mut league: League = serde_json::from_str(LEAGUE).unwrap();
        league.settings.playoff_week_start = Some(u32::MAX);
        assert_eq!(league.final_week(), Some(u32::MAX));

        league.settings.playoff_week_start = None;
        assert_eq!(league.final_week(), None);
    }

    #[test]
    fn test_league_bad_season_is_rejected() {
        let mut league: League = serde_json::from_str(LEAGUE).unwrap();
        league.season = "next".into();
        assert!(league.validate().is_err());
    }

    #[test]
    fn test_roster_null_lists() {
        let roster: Roster = serde_json::from_str(
            r#"{"roster_id": 3, "owner_id": null, "players": null, "starters": null}"#,
        )
        .unwrap();
        assert!(roster.players.is_empty());
        assert!(roster.owner_id.is_none());
        assert!(roster.validate().is_ok());
    }

    #[test]
    fn test_roster_zero_id_is_malformed() {
        let roster: Roster = serde_json::from_str(r#"{"roster_id": 0}"#).unwrap();
        assert!(roster.validate().is_err());
    }

    #[test]
    fn test_user_team_name() {
        let user: User = serde_json::from_str(
            r#"{"user_id":"7","display_name":"sam","metadata":{"team_name":"Gridiron"}}"#,
        )
        .unwrap();
        assert_eq!(user.team_name(), Some("Gridiron"));

        let user: User =
            serde_json::from_str(r#"{"user_id":"7","display_name":"sam","metadata":null}"#).unwrap();
        assert_eq!(user.team_name(), Some("sam"));
    }
}
