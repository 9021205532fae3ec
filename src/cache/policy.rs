//! TTL Policy Module
//!
//! Maps each data category to a time-to-live. Matchup data is the only
//! category whose TTL depends on runtime context (live vs completed week).

use std::fmt;
use std::time::Duration;

use serde::Serialize;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

// == Data Category ==
/// Kind of upstream data an entry holds; drives TTL selection and
/// category-wide invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataCategory {
    LeagueSettings,
    Roster,
    User,
    Matchup,
    PlayerStatic,
    PlayerStats,
    Trending,
    Draft,
    NflState,
}

impl DataCategory {
    pub const ALL: [DataCategory; 9] = [
        DataCategory::LeagueSettings,
        DataCategory::Roster,
        DataCategory::User,
        DataCategory::Matchup,
        DataCategory::PlayerStatic,
        DataCategory::PlayerStats,
        DataCategory::Trending,
        DataCategory::Draft,
        DataCategory::NflState,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DataCategory::LeagueSettings => "league-settings",
            DataCategory::Roster => "roster",
            DataCategory::User => "user",
            DataCategory::Matchup => "matchup",
            DataCategory::PlayerStatic => "player-static",
            DataCategory::PlayerStats => "player-stats",
            DataCategory::Trending => "trending",
            DataCategory::Draft => "draft",
            DataCategory::NflState => "nfl-state",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == TTL Context ==
/// Runtime flags consulted by the policy.
///
/// `live_week` is supplied by the caller or derived from the NFL state
/// endpoint; the policy never infers it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TtlContext {
    pub live_week: bool,
}

impl TtlContext {
    pub fn live() -> Self {
        Self { live_week: true }
    }

    pub fn completed() -> Self {
        Self { live_week: false }
    }
}

// == TTL Policy ==
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtlPolicy {
    pub league_settings: Duration,
    pub roster: Duration,
    pub user: Duration,
    pub matchup_live: Duration,
    pub matchup_final: Duration,
    pub player_static: Duration,
    pub player_stats: Duration,
    pub trending: Duration,
    pub draft: Duration,
    pub nfl_state: Duration,
    /// Replaces every duration above when set
    pub global_override: Option<Duration>,
}

impl TtlPolicy {
    pub fn with_override(mut self, ttl: Option<Duration>) -> Self {
        self.global_override = ttl;
        self
    }

    /// Resolves the TTL for a category under the given context.
    pub fn ttl_for(&self, category: DataCategory, ctx: TtlContext) -> Duration {
        if let Some(ttl) = self.global_override {
            return ttl;
        }

        match category {
            DataCategory::LeagueSettings => self.league_settings,
            DataCategory::Roster => self.roster,
            DataCategory::User => self.user,
            DataCategory::Matchup if ctx.live_week => self.matchup_live,
            DataCategory::Matchup => self.matchup_final,
            DataCategory::PlayerStatic => self.player_static,
            DataCategory::PlayerStats => self.player_stats,
            DataCategory::Trending => self.trending,
            DataCategory::Draft => self.draft,
            DataCategory::NflState => self.nfl_state,
        }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            league_settings: Duration::from_secs(24 * HOUR),
            roster: Duration::from_secs(15 * MINUTE),
            user: Duration::from_secs(HOUR),
            matchup_live: Duration::from_secs(5 * MINUTE),
            matchup_final: Duration::from_secs(HOUR),
            player_static: Duration::from_secs(HOUR),
            player_stats: Duration::from_secs(HOUR),
            trending: Duration::from_secs(30 * MINUTE),
            draft: Duration::from_secs(HOUR),
            nfl_state: Duration::from_secs(5 * MINUTE),
            global_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        let policy = TtlPolicy::default();
        let ctx = TtlContext::default();

        assert_eq!(
            policy.ttl_for(DataCategory::LeagueSettings, ctx),
            Duration::from_secs(86_400)
        );
        assert_eq!(policy.ttl_for(DataCategory::Roster, ctx), Duration::from_secs(900));
        assert_eq!(policy.ttl_for(DataCategory::Trending, ctx), Duration::from_secs(1800));
        assert_eq!(
            policy.ttl_for(DataCategory::PlayerStatic, ctx),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_matchup_ttl_depends_on_live_week() {
        let policy = TtlPolicy::default();

        let live = policy.ttl_for(DataCategory::Matchup, TtlContext::live());
        let done = policy.ttl_for(DataCategory::Matchup, TtlContext::completed());

        assert_eq!(live, Duration::from_secs(300));
        assert_eq!(done, Duration::from_secs(3600));
        assert!(live < done);
    }

    #[test]
    fn test_live_flag_ignored_outside_matchups() {
        let policy = TtlPolicy::default();
        for category in DataCategory::ALL {
            if category == DataCategory::Matchup {
                continue;
            }
            assert_eq!(
                policy.ttl_for(category, TtlContext::live()),
                policy.ttl_for(category, TtlContext::completed()),
                "{category} should not depend on liveness"
            );
        }
    }

    #[test]
    fn test_global_override_applies_everywhere() {
        let policy = TtlPolicy::default().with_override(Some(Duration::from_secs(7)));
        for category in DataCategory::ALL {
            assert_eq!(
                policy.ttl_for(category, TtlContext::live()),
                Duration::from_secs(7)
            );
        }
    }

    #[test]
    fn test_category_names_are_distinct() {
        let mut names: Vec<_> = DataCategory::ALL.iter().map(|c| c.as_str()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), DataCategory::ALL.len());
    }
}
