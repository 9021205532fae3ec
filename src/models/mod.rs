//! Response models for the Sleeper API
//!
//! Typed shapes the fetcher decodes into. Each implements [`Payload`], which
//! adds the shape checks serde alone cannot express and says how a JSON
//! `null` body is interpreted.

pub mod draft;
pub mod league;
pub mod matchup;
pub mod player;
pub mod state;

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

// Re-export commonly used types
pub use draft::{Draft, DraftPick};
pub use league::{League, LeagueSettings, Roster, RosterSettings, User};
pub use matchup::{BracketMatchup, Matchup, WeekMatchups};
pub use player::{Player, PlayerMatch, StatLine, TrendingKind, TrendingPlayer};
pub use state::{NflState, WeekStatus};

// == Payload ==
/// A decoded upstream body that can be validated and cached.
pub trait Payload: DeserializeOwned + Send + Sync + 'static {
    /// Shape checks beyond deserialization. An error makes the whole
    /// response malformed.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Value to use when the body is JSON `null`. `None` means the upstream
    /// is reporting absence.
    fn from_null() -> Option<Self> {
        None
    }

    /// Whether a successfully decoded value still means "nothing there".
    fn is_absent(&self) -> bool {
        false
    }
}

impl<T: Payload> Payload for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.validate().map_err(|e| format!("[{i}]: {e}")))
    }

    fn from_null() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: Payload> Payload for HashMap<String, T> {
    fn validate(&self) -> Result<(), String> {
        self.iter()
            .try_for_each(|(key, item)| item.validate().map_err(|e| format!("[{key}]: {e}")))
    }

    fn from_null() -> Option<Self> {
        Some(HashMap::new())
    }
}

// == Helpers ==
/// Sleeper sends explicit `null` for empty lists and maps.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} is empty"))
    } else {
        Ok(())
    }
}

pub(crate) fn require_season(value: &str) -> Result<(), String> {
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(format!("season {value:?} is not a four-digit year"))
    }
}
