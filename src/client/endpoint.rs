//! Endpoint descriptors
//!
//! An [`Endpoint<T>`] ties an upstream path, its query, its cache key and
//! the payload type it decodes into. Constructors reject identifiers that
//! cannot form a valid path before any I/O happens.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use crate::cache::{CacheKey, DataCategory};
use crate::error::{Result, SleeperError};
use crate::models::{
    BracketMatchup, Draft, DraftPick, League, NflState, Player, Roster, StatLine, TrendingKind,
    TrendingPlayer, User, WeekMatchups,
};

/// Only football is served
pub const SPORT: &str = "nfl";

/// 18 regular-season weeks plus up to four playoff rounds
pub const MAX_WEEK: u32 = 22;

pub const DEFAULT_TRENDING_LOOKBACK_HOURS: u32 = 24;
pub const DEFAULT_TRENDING_LIMIT: u32 = 25;

// == Season Type ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SeasonType {
    Pre,
    #[default]
    Regular,
    Post,
}

impl SeasonType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonType::Pre => "pre",
            SeasonType::Regular => "regular",
            SeasonType::Post => "post",
        }
    }
}

impl fmt::Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Endpoint ==
pub struct Endpoint<T> {
    key: CacheKey,
    path: String,
    query: Vec<(&'static str, String)>,
    _payload: PhantomData<fn() -> T>,
}

impl<T> Endpoint<T> {
    fn new(category: DataCategory, name: &str, path: String) -> Self {
        Self {
            key: CacheKey::new(category, name),
            path,
            query: Vec::new(),
            _payload: PhantomData,
        }
    }

    fn keyed(mut self, value: impl fmt::Display) -> Self {
        self.key = self.key.param(value);
        self
    }

    fn with_query(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        let value = value.to_string();
        self.key = self.key.param(format!("{name}={value}"));
        self.query.push((name, value));
        self
    }

    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    pub fn category(&self) -> DataCategory {
        self.key.category()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(&'static str, String)] {
        &self.query
    }
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            path: self.path.clone(),
            query: self.query.clone(),
            _payload: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Endpoint<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("key", &self.key)
            .field("path", &self.path)
            .field("query", &self.query)
            .finish()
    }
}

// == Validation ==
pub(crate) fn ensure_id<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SleeperError::InvalidRequest(format!("{field} is required")));
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\', '?', '#', '%', ' ']) {
        return Err(SleeperError::InvalidRequest(format!(
            "{field} {value:?} contains characters not allowed in a path segment"
        )));
    }
    Ok(trimmed)
}

pub(crate) fn ensure_season(season: &str) -> Result<&str> {
    let season = season.trim();
    if season.len() == 4 && season.chars().all(|c| c.is_ascii_digit()) {
        Ok(season)
    } else {
        Err(SleeperError::InvalidRequest(format!(
            "season {season:?} must be a four-digit year"
        )))
    }
}

/// Weeks outside the season do not exist upstream.
pub(crate) fn ensure_week(week: u32) -> Result<u32> {
    if (1..=MAX_WEEK).contains(&week) {
        Ok(week)
    } else {
        Err(SleeperError::NotFound(format!(
            "week {week} is outside the season (1-{MAX_WEEK})"
        )))
    }
}

// == Constructors ==
impl Endpoint<League> {
    pub fn league(league_id: &str) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        Ok(Self::new(DataCategory::LeagueSettings, "league", format!("/league/{id}")).keyed(id))
    }
}

impl Endpoint<Vec<League>> {
    pub fn user_leagues(user_id: &str, season: &str) -> Result<Self> {
        let id = ensure_id("user_id", user_id)?;
        let season = ensure_season(season)?;
        Ok(Self::new(
            DataCategory::LeagueSettings,
            "user_leagues",
            format!("/user/{id}/leagues/{SPORT}/{season}"),
        )
        .keyed(id)
        .keyed(season))
    }
}

impl Endpoint<Vec<User>> {
    pub fn league_users(league_id: &str) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        Ok(Self::new(DataCategory::User, "league_users", format!("/league/{id}/users")).keyed(id))
    }
}

impl Endpoint<User> {
    /// Accepts either a username or a user id, as the upstream does.
    pub fn user(username_or_id: &str) -> Result<Self> {
        let id = ensure_id("username", username_or_id)?;
        Ok(Self::new(DataCategory::User, "user", format!("/user/{id}")).keyed(id.to_lowercase()))
    }
}

impl Endpoint<Vec<Roster>> {
    pub fn league_rosters(league_id: &str) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        Ok(Self::new(DataCategory::Roster, "rosters", format!("/league/{id}/rosters")).keyed(id))
    }
}

impl Endpoint<HashMap<String, Player>> {
    pub fn players() -> Self {
        Self::new(DataCategory::PlayerStatic, "players", format!("/players/{SPORT}"))
            .keyed(SPORT)
    }
}

impl Endpoint<Vec<TrendingPlayer>> {
    pub fn trending(kind: TrendingKind, lookback_hours: u32, limit: u32) -> Result<Self> {
        if lookback_hours == 0 || limit == 0 {
            return Err(SleeperError::InvalidRequest(
                "lookback_hours and limit must be positive".to_string(),
            ));
        }
        Ok(Self::new(
            DataCategory::Trending,
            "trending",
            format!("/players/{SPORT}/trending/{kind}"),
        )
        .keyed(kind)
        .with_query("lookback_hours", lookback_hours)
        .with_query("limit", limit))
    }
}

impl Endpoint<HashMap<String, StatLine>> {
    pub fn player_stats(season: &str, season_type: SeasonType, week: Option<u32>) -> Result<Self> {
        let season = ensure_season(season)?;
        let week = week.map(ensure_week).transpose()?;
        let path = match week {
            Some(w) => format!("/stats/{SPORT}/{season_type}/{season}/{w}"),
            None => format!("/stats/{SPORT}/{season_type}/{season}"),
        };
        Ok(Self::new(DataCategory::PlayerStats, "stats", path)
            .keyed(season_type)
            .keyed(season)
            .opt_keyed(week))
    }

    fn opt_keyed(mut self, value: Option<u32>) -> Self {
        self.key = self.key.opt_param(value);
        self
    }
}

impl Endpoint<WeekMatchups> {
    pub fn matchups(league_id: &str, week: u32) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        let week = ensure_week(week)?;
        Ok(Self::new(
            DataCategory::Matchup,
            "matchups",
            format!("/league/{id}/matchups/{week}"),
        )
        .keyed(id)
        .keyed(week))
    }
}

impl Endpoint<Vec<BracketMatchup>> {
    pub fn winners_bracket(league_id: &str) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        Ok(Self::new(
            DataCategory::Matchup,
            "winners_bracket",
            format!("/league/{id}/winners_bracket"),
        )
        .keyed(id))
    }

    pub fn losers_bracket(league_id: &str) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        Ok(Self::new(
            DataCategory::Matchup,
            "losers_bracket",
            format!("/league/{id}/losers_bracket"),
        )
        .keyed(id))
    }
}

impl Endpoint<Draft> {
    pub fn draft(draft_id: &str) -> Result<Self> {
        let id = ensure_id("draft_id", draft_id)?;
        Ok(Self::new(DataCategory::Draft, "draft", format!("/draft/{id}")).keyed(id))
    }
}

impl Endpoint<Vec<DraftPick>> {
    pub fn draft_picks(draft_id: &str) -> Result<Self> {
        let id = ensure_id("draft_id", draft_id)?;
        Ok(Self::new(DataCategory::Draft, "draft_picks", format!("/draft/{id}/picks")).keyed(id))
    }
}

impl Endpoint<Vec<Draft>> {
    pub fn league_drafts(league_id: &str) -> Result<Self> {
        let id = ensure_id("league_id", league_id)?;
        Ok(Self::new(DataCategory::Draft, "league_drafts", format!("/league/{id}/drafts")).keyed(id))
    }

    pub fn user_drafts(user_id: &str, season: &str) -> Result<Self> {
        let id = ensure_id("user_id", user_id)?;
        let season = ensure_season(season)?;
        Ok(Self::new(
            DataCategory::Draft,
            "user_drafts",
            format!("/user/{id}/drafts/{SPORT}/{season}"),
        )
        .keyed(id)
        .keyed(season))
    }
}

impl Endpoint<NflState> {
    pub fn nfl_state() -> Self {
        Self::new(DataCategory::NflState, "state", format!("/state/{SPORT}")).keyed(SPORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_league_endpoint() {
        let ep = Endpoint::league("123").unwrap();
        assert_eq!(ep.path(), "/league/123");
        assert_eq!(ep.key().as_str(), "league-settings:league:123");
        assert_eq!(ep.category(), DataCategory::LeagueSettings);
    }

    #[test]
    fn test_empty_or_unsafe_ids_are_rejected() {
        assert_eq!(
            Endpoint::league("  ").unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
        assert_eq!(
            Endpoint::league_rosters("1/../2").unwrap_err().kind(),
            ErrorKind::InvalidRequest
        );
    }

    #[test]
    fn test_ids_that_could_escape_the_path_are_rejected() {
        for id in ["..", ".", "1%2F2", "%2e%2e", "a\\b", "1?x=2"] {
            assert_eq!(
                Endpoint::league(id).unwrap_err().kind(),
                ErrorKind::InvalidRequest,
                "{id:?} should be rejected"
            );
        }
        assert!(Endpoint::league("1049.5").is_ok());
        assert!(Endpoint::user("some_user").is_ok());
    }

    #[test]
    fn test_week_range() {
        assert!(Endpoint::matchups("1", 1).is_ok());
        assert!(Endpoint::matchups("1", MAX_WEEK).is_ok());
        assert_eq!(
            Endpoint::matchups("1", 0).unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            Endpoint::matchups("1", 23).unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_trending_query_is_part_of_key() {
        let a = Endpoint::trending(TrendingKind::Add, 24, 25).unwrap();
        let b = Endpoint::trending(TrendingKind::Add, 48, 25).unwrap();
        let c = Endpoint::trending(TrendingKind::Drop, 24, 25).unwrap();

        assert_eq!(a.path(), "/players/nfl/trending/add");
        assert_eq!(a.query(), &[("lookback_hours", "24".to_string()), ("limit", "25".to_string())]);
        assert_ne!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_stats_paths() {
        let season = Endpoint::player_stats("2024", SeasonType::Regular, None).unwrap();
        let week = Endpoint::player_stats("2024", SeasonType::Regular, Some(3)).unwrap();
        assert_eq!(season.path(), "/stats/nfl/regular/2024");
        assert_eq!(week.path(), "/stats/nfl/regular/2024/3");
        assert_ne!(season.key(), week.key());

        assert_eq!(
            Endpoint::player_stats("24", SeasonType::Post, None)
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidRequest
        );
    }

    #[test]
    fn test_user_key_is_case_insensitive() {
        let a = Endpoint::user("SomeOne").unwrap();
        let b = Endpoint::user("someone").unwrap();
        assert_eq!(a.key(), b.key());
        assert_eq!(a.path(), "/user/SomeOne");
    }

    #[test]
    fn test_categories_follow_data_kind() {
        assert_eq!(Endpoint::league_rosters("1").unwrap().category(), DataCategory::Roster);
        assert_eq!(Endpoint::draft_picks("d").unwrap().category(), DataCategory::Draft);
        assert_eq!(Endpoint::players().category(), DataCategory::PlayerStatic);
        assert_eq!(Endpoint::nfl_state().category(), DataCategory::NflState);
        assert_eq!(
            Endpoint::user_leagues("u", "2024").unwrap().path(),
            "/user/u/leagues/nfl/2024"
        );
    }
}
