//! Sleeper API client
//!
//! Every typed operation resolves to an [`Endpoint`] and goes through
//! [`SleeperClient::execute`]: cache lookup, then paced and retried upstream
//! fetches, then a cache write on success only. The cache lock is never held
//! across network I/O.

mod endpoint;
mod search;

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{
    CacheInfo, CacheKey, CacheStats, CacheStore, DataCategory, SharedCache, TtlContext, TtlPolicy,
};
use crate::config::ClientConfig;
use crate::error::{ErrorKind, Result, SleeperError};
use crate::http::HttpFetcher;
use crate::models::{
    BracketMatchup, Draft, DraftPick, League, NflState, Payload, Player, PlayerMatch, Roster,
    StatLine, TrendingKind, TrendingPlayer, User, WeekMatchups,
};
use crate::retry::{BackoffPolicy, RequestOutcome, RequestPacer, RetryOrchestrator};
use crate::tasks::spawn_cleanup_task;

pub use endpoint::{
    Endpoint, SeasonType, DEFAULT_TRENDING_LIMIT, DEFAULT_TRENDING_LOOKBACK_HOURS, MAX_WEEK, SPORT,
};
pub use search::{find_players, MAX_CANDIDATES};

/// Cached values are stored type-erased; each [`Endpoint`] knows its type.
pub type CachedValue = Arc<dyn Any + Send + Sync>;

// == Fetched ==
/// A value served by [`SleeperClient::execute_or_stale`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: Arc<T>,
    /// True when the upstream failed and an expired cache entry was served.
    pub stale: bool,
}

// == Sleeper Client ==
/// Cheap to clone; clones share the cache, pacer and connection pool.
#[derive(Clone)]
pub struct SleeperClient {
    fetcher: HttpFetcher,
    retry: RetryOrchestrator,
    pacer: Arc<RequestPacer>,
    ttl: TtlPolicy,
    cache: SharedCache<CachedValue>,
}

impl SleeperClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let cache = Arc::new(RwLock::new(CacheStore::new(config.cache_max_entries)));
        Self::with_cache(config, cache)
    }

    /// Builds a client from `SLEEPER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Builds a client over an existing cache, e.g. one shared with another client.
    pub fn with_cache(config: ClientConfig, cache: SharedCache<CachedValue>) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config)?;
        info!(
            base_url = fetcher.base_url(),
            max_retries = config.max_retries,
            requests_per_minute = config.requests_per_minute,
            "sleeper client ready"
        );

        Ok(Self {
            fetcher,
            retry: RetryOrchestrator::new(BackoffPolicy::from_config(&config)),
            pacer: Arc::new(
                RequestPacer::new(config.requests_per_minute)
                    .with_min_interval(config.min_request_interval),
            ),
            ttl: TtlPolicy::default().with_override(config.cache_ttl_override),
            cache,
        })
    }

    pub fn with_ttl_policy(mut self, ttl: TtlPolicy) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn cache(&self) -> &SharedCache<CachedValue> {
        &self.cache
    }

    pub fn ttl_policy(&self) -> &TtlPolicy {
        &self.ttl
    }

    // == Execute ==
    /// Serves `endpoint` from cache or fetches it upstream.
    ///
    /// Concurrent misses on the same key each fetch; the last successful
    /// write wins. Failures never touch the cache.
    pub async fn execute<T: Payload>(&self, endpoint: &Endpoint<T>, ctx: TtlContext) -> Result<Arc<T>> {
        if let Some(hit) = self.cached(endpoint.key()).await {
            return Ok(hit);
        }

        let value = Arc::new(self.fetch_upstream(endpoint).await?);
        self.store(endpoint, value.clone(), ctx).await;
        Ok(value)
    }

    /// Like [`execute`](Self::execute), but when the upstream is rate
    /// limiting or unreachable an expired entry for the same key is served
    /// instead, flagged as stale.
    pub async fn execute_or_stale<T: Payload>(
        &self,
        endpoint: &Endpoint<T>,
        ctx: TtlContext,
    ) -> Result<Fetched<T>> {
        let err = match self.execute(endpoint, ctx).await {
            Ok(value) => return Ok(Fetched { value, stale: false }),
            Err(err) => err,
        };

        if !matches!(err.kind(), ErrorKind::RateLimited | ErrorKind::NetworkError) {
            return Err(err);
        }

        let stale = self.cache.read().await.get_stale(endpoint.key());
        match stale {
            Some(read) => match read.value.downcast::<T>() {
                Ok(value) => {
                    warn!(
                        key = %endpoint.key(),
                        age_secs = read.age.as_secs(),
                        error = %err,
                        "serving stale cache entry"
                    );
                    Ok(Fetched { value, stale: true })
                }
                Err(_) => Err(err),
            },
            None => Err(err),
        }
    }

    async fn cached<T: Payload>(&self, key: &CacheKey) -> Option<Arc<T>> {
        let erased = self.cache.write().await.get(key)?;
        match erased.downcast::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key = %key, "cached value has unexpected type, refetching");
                None
            }
        }
    }

    async fn fetch_upstream<T: Payload>(&self, endpoint: &Endpoint<T>) -> Result<T> {
        self.retry
            .run(|attempt| async move {
                self.pacer.acquire().await;
                self.fetcher
                    .fetch::<T>(endpoint.path(), endpoint.query(), attempt)
                    .await
            })
            .await
    }

    async fn store<T: Payload>(&self, endpoint: &Endpoint<T>, value: Arc<T>, ctx: TtlContext) {
        let ttl = self.ttl.ttl_for(endpoint.category(), ctx);
        let erased: CachedValue = value;
        let result = self.cache.write().await.put(endpoint.key(), erased, ttl);
        match result {
            Ok(()) => debug!(key = %endpoint.key(), ttl_secs = ttl.as_secs(), "cached upstream response"),
            Err(err) => warn!(key = %endpoint.key(), error = %err, "response not cached"),
        }
    }

    // == Leagues and Users ==
    pub async fn fetch_league(&self, league_id: &str) -> Result<Arc<League>> {
        self.execute(&Endpoint::league(league_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_league_users(&self, league_id: &str) -> Result<Arc<Vec<User>>> {
        self.execute(&Endpoint::league_users(league_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_league_rosters(&self, league_id: &str) -> Result<Arc<Vec<Roster>>> {
        self.execute(&Endpoint::league_rosters(league_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_user(&self, username_or_id: &str) -> Result<Arc<User>> {
        self.execute(&Endpoint::user(username_or_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_user_leagues(&self, user_id: &str, season: &str) -> Result<Arc<Vec<League>>> {
        self.execute(&Endpoint::user_leagues(user_id, season)?, TtlContext::default())
            .await
    }

    // == Players ==
    pub async fn fetch_players(&self) -> Result<Arc<HashMap<String, Player>>> {
        self.execute(&Endpoint::players(), TtlContext::default())
            .await
    }

    /// Looks a player up by name, optionally restricted to one position.
    ///
    /// Several candidates are returned as [`PlayerMatch::Ambiguous`]; no
    /// candidate at all is `NotFound`.
    pub async fn search_players(&self, name: &str, position: Option<&str>) -> Result<PlayerMatch> {
        if name.trim().is_empty() {
            return Err(SleeperError::InvalidRequest("player name is required".to_string()));
        }
        let players = self.fetch_players().await?;
        find_players(&players, name, position).ok_or_else(|| {
            SleeperError::NotFound(match position {
                Some(pos) => format!("no {pos} player matches {name:?}"),
                None => format!("no player matches {name:?}"),
            })
        })
    }

    pub async fn fetch_trending(
        &self,
        kind: TrendingKind,
        lookback_hours: Option<u32>,
        limit: Option<u32>,
    ) -> Result<Arc<Vec<TrendingPlayer>>> {
        let endpoint = Endpoint::trending(
            kind,
            lookback_hours.unwrap_or(DEFAULT_TRENDING_LOOKBACK_HOURS),
            limit.unwrap_or(DEFAULT_TRENDING_LIMIT),
        )?;
        self.execute(&endpoint, TtlContext::default()).await
    }

    /// Season totals when `week` is `None`, otherwise a single week.
    pub async fn fetch_player_stats(
        &self,
        season: &str,
        season_type: SeasonType,
        week: Option<u32>,
    ) -> Result<Arc<HashMap<String, StatLine>>> {
        let endpoint = Endpoint::player_stats(season, season_type, week)?;
        self.execute(&endpoint, TtlContext::default()).await
    }

    // == Matchups ==
    /// Matchups for one week. `ctx` decides the live or final TTL.
    pub async fn fetch_matchups(
        &self,
        league_id: &str,
        week: u32,
        ctx: TtlContext,
    ) -> Result<Arc<WeekMatchups>> {
        self.execute(&Endpoint::matchups(league_id, week)?, ctx).await
    }

    /// Matchups for one week, with the TTL chosen from the NFL calendar and
    /// weeks past the league's final playoff week reported as `NotFound`.
    pub async fn fetch_matchups_current(&self, league_id: &str, week: u32) -> Result<Arc<WeekMatchups>> {
        let endpoint = Endpoint::matchups(league_id, week)?;
        let league = self.fetch_league(league_id).await?;

        if let Some(final_week) = league.final_week() {
            if week > final_week {
                return Err(SleeperError::NotFound(format!(
                    "week {week} is after the final week ({final_week}) of league {league_id}"
                )));
            }
        }

        let state = self.fetch_nfl_state().await?;
        let ctx = state.week_status(&league.season, week).ttl_context();
        self.execute(&endpoint, ctx).await
    }

    pub async fn fetch_winners_bracket(&self, league_id: &str) -> Result<Arc<Vec<BracketMatchup>>> {
        self.execute(&Endpoint::winners_bracket(league_id)?, TtlContext::completed())
            .await
    }

    pub async fn fetch_losers_bracket(&self, league_id: &str) -> Result<Arc<Vec<BracketMatchup>>> {
        self.execute(&Endpoint::losers_bracket(league_id)?, TtlContext::completed())
            .await
    }

    // == Drafts ==
    pub async fn fetch_draft(&self, draft_id: &str) -> Result<Arc<Draft>> {
        self.execute(&Endpoint::draft(draft_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_draft_picks(&self, draft_id: &str) -> Result<Arc<Vec<DraftPick>>> {
        self.execute(&Endpoint::draft_picks(draft_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_league_drafts(&self, league_id: &str) -> Result<Arc<Vec<Draft>>> {
        self.execute(&Endpoint::league_drafts(league_id)?, TtlContext::default())
            .await
    }

    pub async fn fetch_user_drafts(&self, user_id: &str, season: &str) -> Result<Arc<Vec<Draft>>> {
        self.execute(&Endpoint::user_drafts(user_id, season)?, TtlContext::default())
            .await
    }

    // == NFL State ==
    pub async fn fetch_nfl_state(&self) -> Result<Arc<NflState>> {
        self.execute(&Endpoint::nfl_state(), TtlContext::default())
            .await
    }

    /// One uncached, unretried request to the state endpoint.
    pub async fn health_check(&self) -> Result<()> {
        let endpoint = Endpoint::nfl_state();
        self.pacer.acquire().await;
        match self
            .fetcher
            .fetch::<NflState>(endpoint.path(), endpoint.query(), 0)
            .await
        {
            RequestOutcome::Success(_) => Ok(()),
            RequestOutcome::Retryable(failure) => {
                Err(failure.into_exhausted(self.retry.policy().delay_for(0), 1))
            }
            RequestOutcome::Fatal(err) => Err(err),
        }
    }

    // == Invalidation ==
    pub async fn invalidate<T>(&self, endpoint: &Endpoint<T>) -> bool {
        self.cache.write().await.invalidate(endpoint.key())
    }

    pub async fn invalidate_category(&self, category: DataCategory) -> usize {
        let removed = self.cache.write().await.invalidate_category(category);
        info!(%category, removed, "invalidated cache category");
        removed
    }

    /// Drops cached rosters for one league, e.g. after a trade or waiver run.
    pub async fn invalidate_rosters(&self, league_id: &str) -> Result<bool> {
        Ok(self.invalidate(&Endpoint::league_rosters(league_id)?).await)
    }

    pub async fn clear_cache(&self) -> usize {
        let removed = self.cache.write().await.clear();
        info!(removed, "cache cleared");
        removed
    }

    // == Introspection ==
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    pub async fn cache_info(&self) -> CacheInfo {
        self.cache.read().await.info()
    }

    /// Starts a background sweep of expired entries. Abort the handle to stop it.
    pub fn spawn_cache_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        spawn_cleanup_task(self.cache.clone(), interval)
    }
}

impl std::fmt::Debug for SleeperClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SleeperClient")
            .field("base_url", &self.fetcher.base_url())
            .field("retry", self.retry.policy())
            .finish_non_exhaustive()
    }
}
