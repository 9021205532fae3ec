//! Player, trending and stat models

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{null_as_default, require_non_empty, Payload};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub years_exp: Option<u32>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fantasy_positions: Vec<String>,
}

impl Player {
    /// Full name, or first and last joined when Sleeper omits it (team defenses).
    pub fn display_name(&self) -> String {
        if let Some(full) = self.full_name.as_deref().filter(|n| !n.is_empty()) {
            return full.to_string();
        }
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            self.player_id.clone()
        } else {
            parts.join(" ")
        }
    }

    pub fn plays(&self, position: &str) -> bool {
        self.position
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case(position))
    }
}

impl Payload for Player {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("player_id", &self.player_id)
    }
}

// == Player Match ==
/// Outcome of a name lookup. More than one candidate means the caller has to
/// disambiguate; it is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerMatch {
    Unique(Player),
    Ambiguous(Vec<Player>),
}

impl PlayerMatch {
    pub fn candidates(&self) -> &[Player] {
        match self {
            PlayerMatch::Unique(player) => std::slice::from_ref(player),
            PlayerMatch::Ambiguous(players) => players,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, PlayerMatch::Ambiguous(_))
    }
}

// == Trending ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendingKind {
    Add,
    Drop,
}

impl TrendingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingKind::Add => "add",
            TrendingKind::Drop => "drop",
        }
    }
}

impl fmt::Display for TrendingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingPlayer {
    pub player_id: String,
    pub count: u32,
}

impl Payload for TrendingPlayer {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("player_id", &self.player_id)
    }
}

// == Stat Line ==
/// One player's stat totals, keyed by Sleeper stat name (`pts_ppr`, `rec`...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatLine(pub HashMap<String, f64>);

impl StatLine {
    pub fn get(&self, stat: &str) -> Option<f64> {
        self.0.get(stat).copied()
    }
}

impl Payload for StatLine {
    fn validate(&self) -> Result<(), String> {
        match self.0.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, _)) => Err(format!("stat {name} is not a finite number")),
            None => Ok(()),
        }
    }
}
