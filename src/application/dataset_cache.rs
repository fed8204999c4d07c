// Variant dataset cache - bounded, insertion-ordered, shared across all variants
use crate::application::analytics_source::AnalyticsSource;
use crate::domain::error::{AnalyticsError, AnalyticsResult};
use crate::domain::telemetry::{SeriesKey, VariantSeries};
use crate::domain::variant::VariantKind;
use futures::future::{BoxFuture, FutureExt, Shared};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_MAX_DATASETS: usize = 20;

type LoadOutcome = AnalyticsResult<Option<Arc<VariantSeries>>>;
type SharedLoad = Shared<BoxFuture<'static, LoadOutcome>>;

/// Single-flight key: loads join only when they normalize with the same interval.
type LoadKey = (SeriesKey, u64);

struct PendingLoad {
    ticket: u64,
    load: SharedLoad,
}

#[derive(Default)]
struct CacheState {
    /// Oldest insertion first. The order is only changed by inserts, never by reads.
    entries: IndexMap<SeriesKey, Arc<VariantSeries>>,
    /// A load may only insert while its own ticket is still registered here.
    pending: HashMap<LoadKey, PendingLoad>,
    next_ticket: u64,
}

impl CacheState {
    fn insert(&mut self, key: SeriesKey, series: Arc<VariantSeries>, capacity: usize) -> Vec<SeriesKey> {
        self.entries.shift_remove(&key);
        self.entries.insert(key, series);

        let mut evicted = Vec::new();
        while self.entries.len() > capacity {
            match self.entries.shift_remove_index(0) {
                Some((key, _)) => evicted.push(key),
                None => break,
            }
        }
        evicted
    }
}

/// Caches normalized telemetry per `(trial, variant)`, holding at most
/// `capacity` datasets across all variants and evicting the earliest inserted.
///
/// Concurrent loads of the same key share one request to the data source.
pub struct DatasetCache {
    source: Arc<dyn AnalyticsSource>,
    state: Arc<Mutex<CacheState>>,
    capacity: usize,
}

impl DatasetCache {
    pub fn new(source: Arc<dyn AnalyticsSource>, capacity: usize) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CacheState::default())),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Return the cached dataset or fetch, normalize and cache it.
    ///
    /// `interval` is the sampling interval in ticks used for rate conversion.
    /// A cache hit returns the dataset as it was normalized when inserted,
    /// whatever `interval` is passed now. Callers joining an in-flight load
    /// share it only when their `interval` matches.
    /// Returns `Ok(None)` without caching anything when the source has no data.
    pub async fn load_dataset(&self, trial_id: &str, variant: VariantKind, interval: u64) -> LoadOutcome {
        let key = SeriesKey::new(trial_id, variant);

        let load = {
            let mut state = lock(&self.state);
            if let Some(series) = state.entries.get(&key) {
                tracing::debug!("Dataset cache hit for {} {}", trial_id, variant);
                return Ok(Some(Arc::clone(series)));
            }

            let load_key = (key, interval);
            match state.pending.get(&load_key) {
                Some(pending) => {
                    tracing::debug!("Joining in-flight load for {} {}", trial_id, variant);
                    pending.load.clone()
                }
                None => {
                    tracing::debug!("Dataset cache miss for {} {}", trial_id, variant);
                    let ticket = state.next_ticket;
                    state.next_ticket += 1;
                    let load = self.start_load(load_key.clone(), ticket);
                    state.pending.insert(
                        load_key,
                        PendingLoad {
                            ticket,
                            load: load.clone(),
                        },
                    );
                    load
                }
            }
        };

        load.await
    }

    fn start_load(&self, load_key: LoadKey, ticket: u64) -> SharedLoad {
        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let capacity = self.capacity;

        async move {
            let (key, interval) = &load_key;
            let fetched = fetch_series(source.as_ref(), key, *interval).await;

            let mut state = lock(&state);
            // A clear since the fetch began drops the ticket; the result then
            // goes to the waiting callers but never into the cache.
            let current = state
                .pending
                .get(&load_key)
                .is_some_and(|pending| pending.ticket == ticket);
            if current {
                state.pending.remove(&load_key);
            }

            let series = match fetched {
                Ok(Some(series)) => Arc::new(series),
                Ok(None) => return Ok(None),
                Err(e) => return Err(e),
            };

            if !current {
                tracing::debug!("Discarding load of {} {} cleared while in flight", key.trial_id, key.variant);
                return Ok(Some(series));
            }

            for evicted in state.insert(key.clone(), Arc::clone(&series), capacity) {
                tracing::info!("Evicted dataset {} {}", evicted.trial_id, evicted.variant);
            }
            Ok(Some(series))
        }
        .boxed()
        .shared()
    }

    /// Drop every variant cached for `trial_id`, along with any load of it
    /// still in flight. No-op when nothing is cached.
    pub fn clear_dataset(&self, trial_id: &str) {
        let mut state = lock(&self.state);
        state.pending.retain(|(key, _), _| key.trial_id != trial_id);
        for variant in VariantKind::ALL {
            if state.entries.shift_remove(&SeriesKey::new(trial_id, variant)).is_some() {
                tracing::debug!("Cleared dataset {} {}", trial_id, variant);
            }
        }
    }

    pub fn clear_all_datasets(&self) {
        let mut state = lock(&self.state);
        let cleared = state.entries.len();
        state.entries.clear();
        state.pending.clear();
        tracing::info!("Cleared {} cached datasets", cleared);
    }

    pub fn get(&self, trial_id: &str, variant: VariantKind) -> Option<Arc<VariantSeries>> {
        lock(&self.state)
            .entries
            .get(&SeriesKey::new(trial_id, variant))
            .cloned()
    }

    pub fn contains(&self, trial_id: &str, variant: VariantKind) -> bool {
        lock(&self.state)
            .entries
            .contains_key(&SeriesKey::new(trial_id, variant))
    }

    pub fn len(&self) -> usize {
        lock(&self.state).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of cached datasets of one variant.
    pub fn namespace_len(&self, variant: VariantKind) -> usize {
        lock(&self.state)
            .entries
            .keys()
            .filter(|key| key.variant == variant)
            .count()
    }

    /// Cached keys, oldest insertion first.
    pub fn keys(&self) -> Vec<SeriesKey> {
        lock(&self.state).entries.keys().cloned().collect()
    }

    /// Number of loads currently waiting on the data source.
    pub fn in_flight(&self) -> usize {
        lock(&self.state).pending.len()
    }
}

async fn fetch_series(
    source: &dyn AnalyticsSource,
    key: &SeriesKey,
    interval: u64,
) -> AnalyticsResult<Option<VariantSeries>> {
    let payload = source
        .query_data(&key.trial_id, &key.variant.category())
        .await
        .map_err(|e| {
            tracing::warn!("Failed to fetch {} data for {}: {:#}", key.variant, key.trial_id, e);
            AnalyticsError::from_source(e)
        })?;

    match payload {
        Some(payload) => VariantSeries::ingest(&key.trial_id, key.variant, &payload, interval).map(Some),
        None => {
            tracing::debug!("No {} data for trial {}", key.variant, key.trial_id);
            Ok(None)
        }
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
