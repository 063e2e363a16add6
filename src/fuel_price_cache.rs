use crate::goriva_api::{GorivaApi, StationRecord};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

/// Minimum time between two actual network fetches from goriva.si,
/// regardless of how often callers invoke refresh
pub const MIN_TIME_BETWEEN_UPDATES: Duration = Duration::from_secs(110 * 60);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to goriva.si failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("no stations matched filter `{0}`")]
    NoResults(String),
}

/// Read-only view of the cache. Always a whole record from a single fetch,
/// never a mix of two.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub record: Option<StationRecord>,
    pub available: bool,
}

struct CacheState {
    record: Option<StationRecord>,
    available: bool,
    last_attempt: Option<Instant>,
}

impl CacheState {
    fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            record: self.record.clone(),
            available: self.available,
        }
    }
}

/// Shared, throttled cache of the latest station record for one name filter.
///
/// All sensors for the station hold the same cache. The mutex is held across
/// the whole check-window/fetch/replace sequence, so at most one network
/// fetch happens per throttle interval even with concurrent callers.
pub struct FuelPriceCache {
    api: GorivaApi,
    name_filter: String,
    min_interval: Duration,
    state: Mutex<CacheState>,
}

impl FuelPriceCache {
    pub fn new(api: GorivaApi, name_filter: impl Into<String>) -> Self {
        Self::with_interval(api, name_filter, MIN_TIME_BETWEEN_UPDATES)
    }

    /// Creates a cache with a custom throttle interval, used by tests
    pub fn with_interval(
        api: GorivaApi,
        name_filter: impl Into<String>,
        min_interval: Duration,
    ) -> Self {
        Self {
            api,
            name_filter: name_filter.into(),
            min_interval,
            state: Mutex::new(CacheState {
                record: None,
                available: false,
                last_attempt: None,
            }),
        }
    }

    pub fn name_filter(&self) -> &str {
        &self.name_filter
    }

    /// Refreshes the cache, subject to throttling.
    ///
    /// Inside the throttle window this is a no-op returning the cache as it
    /// stands. Otherwise one fetch is attempted: on success the record is
    /// replaced wholesale and the cache marked available; on failure the
    /// previous record is retained (stale but present), the cache is marked
    /// unavailable and the error is returned for the caller to degrade on.
    pub async fn refresh(&self) -> Result<CacheSnapshot, FetchError> {
        let mut state = self.state.lock().await;

        if let Some(last_attempt) = state.last_attempt {
            if last_attempt.elapsed() < self.min_interval {
                return Ok(state.snapshot());
            }
        }
        state.last_attempt = Some(Instant::now());

        match self.fetch_first_match().await {
            Ok(record) => {
                state.record = Some(record);
                state.available = true;
                Ok(state.snapshot())
            }
            Err(e) => {
                println!(
                    "Unable to fetch data from goriva.si for filter `{}`: {e}",
                    self.name_filter
                );
                state.available = false;
                Err(e)
            }
        }
    }

    /// Returns the current cache state without touching the network
    pub async fn snapshot(&self) -> CacheSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Forgets the last attempt time so the next refresh really fetches.
    /// Setup uses this after a failed discovery: the host retries setup on
    /// its own schedule, which must not be starved by the throttle window.
    pub(crate) async fn reset_throttle(&self) {
        self.state.lock().await.last_attempt = None;
    }

    async fn fetch_first_match(&self) -> Result<StationRecord, FetchError> {
        let response = self.api.search(&self.name_filter).await?;
        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::NoResults(self.name_filter.clone()))
    }
}
