//! TTL guarded cache of the USD rate table.
//!
//! The cache decides between reusing the last fetched table and calling the
//! [`RateFetcher`]. Every fetch failure is recovered here: callers always get
//! the best table available, together with a [`RefreshOutcome`] that says
//! where it came from.

use crate::core::rates::{CacheEntry, RateFetcher, RateSnapshot, RateTable};
use crate::core::store::{FX_CACHE_KEY, FX_CACHE_TS_KEY, KeyValueCollection};
use std::sync::{Arc, RwLock};
use tracing::{debug, instrument, warn};

/// Wall clock in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Result of [`RateCache::refresh`].
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// A fetch succeeded and the new table was stored.
    Fetched(RateTable),
    /// The cached table was still fresh; no network call was made.
    Cached(RateTable),
    /// The fetch failed and the previously cached table was served.
    Stale(RateTable),
    /// The fetch failed and nothing was cached; static defaults were served.
    Defaulted(RateTable),
}

impl RefreshOutcome {
    pub fn table(&self) -> &RateTable {
        match self {
            RefreshOutcome::Fetched(t)
            | RefreshOutcome::Cached(t)
            | RefreshOutcome::Stale(t)
            | RefreshOutcome::Defaulted(t) => t,
        }
    }

    pub fn into_table(self) -> RateTable {
        match self {
            RefreshOutcome::Fetched(t)
            | RefreshOutcome::Cached(t)
            | RefreshOutcome::Stale(t)
            | RefreshOutcome::Defaulted(t) => t,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RefreshOutcome::Fetched(_) => "fetched",
            RefreshOutcome::Cached(_) => "cached",
            RefreshOutcome::Stale(_) => "stale",
            RefreshOutcome::Defaulted(_) => "defaults",
        }
    }
}

pub struct RateCache {
    fetcher: Arc<dyn RateFetcher>,
    store: Arc<dyn KeyValueCollection>,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry>>,
}

impl RateCache {
    /// Creates the cache, reusing any entry persisted by an earlier session.
    pub async fn open(
        fetcher: Arc<dyn RateFetcher>,
        store: Arc<dyn KeyValueCollection>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let entry = load_entry(store.as_ref()).await;
        Self {
            fetcher,
            store,
            clock,
            entry: RwLock::new(entry),
        }
    }

    /// Last known good table, or the static defaults when nothing is cached.
    pub fn current(&self) -> RateTable {
        self.cached()
            .map(|entry| entry.table)
            .unwrap_or_else(RateTable::defaults)
    }

    pub fn cached(&self) -> Option<CacheEntry> {
        match self.entry.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Refreshes the table unless a fresh one is cached and `force` is false.
    #[instrument(name = "RateRefresh", skip(self))]
    pub async fn refresh(&self, force: bool) -> RefreshOutcome {
        let cached = self.cached();
        if !force
            && let Some(entry) = cached.as_ref()
            && entry.is_fresh(self.clock.now_ms())
        {
            debug!("Rate cache HIT, fetched at {}", entry.fetched_at_ms);
            return RefreshOutcome::Cached(entry.table.clone());
        }

        debug!(force, "Rate cache MISS, fetching rates");
        match self.fetcher.fetch().await {
            Ok(table) => {
                let entry = CacheEntry {
                    table: table.clone(),
                    fetched_at_ms: self.clock.now_ms(),
                };
                self.persist(&entry).await;
                self.replace(entry);
                RefreshOutcome::Fetched(table)
            }
            Err(e) => {
                warn!("Rate refresh failed, keeping previous table: {}", e);
                match cached {
                    Some(entry) => RefreshOutcome::Stale(entry.table),
                    None => RefreshOutcome::Defaulted(RateTable::defaults()),
                }
            }
        }
    }

    fn replace(&self, entry: CacheEntry) {
        match self.entry.write() {
            Ok(mut guard) => *guard = Some(entry),
            Err(poisoned) => *poisoned.into_inner() = Some(entry),
        }
    }

    async fn persist(&self, entry: &CacheEntry) {
        let serialized = match entry.table.to_json() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize rate table: {}", e);
                return;
            }
        };
        let fetched_at = entry.fetched_at_ms.to_string();
        if let Err(e) = self
            .store
            .set_many(&[
                (FX_CACHE_KEY, serialized.as_str()),
                (FX_CACHE_TS_KEY, fetched_at.as_str()),
            ])
            .await
        {
            warn!("Failed to store rate table: {e:#}");
        }
    }
}

impl RateSnapshot for RateCache {
    fn current(&self) -> RateTable {
        RateCache::current(self)
    }
}

async fn load_entry(store: &dyn KeyValueCollection) -> Option<CacheEntry> {
    let raw = store.get(FX_CACHE_KEY).await?;
    let table = match RateTable::from_json(&raw) {
        Ok(table) => table,
        Err(e) => {
            debug!("Ignoring unreadable cached rate table: {}", e);
            return None;
        }
    };
    let fetched_at_ms = store
        .get(FX_CACHE_TS_KEY)
        .await
        .and_then(|ts| ts.trim().parse::<i64>().ok())
        .unwrap_or(0);
    debug!("Loaded cached rate table fetched at {}", fetched_at_ms);
    Some(CacheEntry {
        table,
        fetched_at_ms,
    })
}
