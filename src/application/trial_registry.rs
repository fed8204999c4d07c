// Trial/source registry - the few trials and sources currently open
use crate::application::analytics_source::AnalyticsSource;
use crate::application::dataset_cache::DatasetCache;
use crate::domain::error::{AnalyticsError, AnalyticsResult};
use crate::domain::trial::{Source, Trial};
use indexmap::IndexMap;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub const DEFAULT_MAX_TRIALS: usize = 5;
pub const DEFAULT_MAX_SOURCES: usize = 5;

#[derive(Default)]
struct RegistryState {
    trials: HashMap<String, Arc<Trial>>,
    /// Newest first.
    trial_order: VecDeque<String>,
    /// Insertion order; the first entry is evicted on overflow.
    sources: IndexMap<String, Arc<Source>>,
}

impl RegistryState {
    /// Forget a trial and the source it references. The caller clears its datasets.
    fn drop_trial(&mut self, id: &str) {
        self.trial_order.retain(|t| t != id);
        if let Some(trial) = self.trials.remove(id) {
            if let Some(source_id) = &trial.source {
                self.sources.shift_remove(source_id);
            }
        }
    }
}

/// Keeps at most `max_trials` trials and `max_sources` sources. Dropping a
/// trial always drops its cached datasets too.
pub struct TrialRegistry {
    api: Arc<dyn AnalyticsSource>,
    datasets: Arc<DatasetCache>,
    state: Mutex<RegistryState>,
    max_trials: usize,
    max_sources: usize,
}

impl TrialRegistry {
    pub fn new(
        api: Arc<dyn AnalyticsSource>,
        datasets: Arc<DatasetCache>,
        max_trials: usize,
        max_sources: usize,
    ) -> Self {
        Self {
            api,
            datasets,
            state: Mutex::new(RegistryState::default()),
            max_trials: max_trials.max(1),
            max_sources: max_sources.max(1),
        }
    }

    pub fn datasets(&self) -> &Arc<DatasetCache> {
        &self.datasets
    }

    /// Register a trial as the newest one, evicting the oldest when full.
    pub fn add_trial(&self, trial: Trial) -> AnalyticsResult<Arc<Trial>> {
        if trial.id.is_empty() {
            return Err(AnalyticsError::InvalidArgument("trial has no id".to_string()));
        }

        let trial = Arc::new(trial);
        let mut state = lock(&self.state);

        if state.trial_order.contains(&trial.id) {
            state.trial_order.retain(|t| t != &trial.id);
        } else if state.trial_order.len() >= self.max_trials {
            if let Some(oldest) = state.trial_order.back().cloned() {
                tracing::info!("Evicting trial {} to make room for {}", oldest, trial.id);
                state.drop_trial(&oldest);
                self.datasets.clear_dataset(&oldest);
            }
        }

        state.trial_order.push_front(trial.id.clone());
        state.trials.insert(trial.id.clone(), Arc::clone(&trial));
        tracing::debug!("Registered trial {}", trial.id);
        Ok(trial)
    }

    pub fn add_source(&self, source: Source) -> AnalyticsResult<Arc<Source>> {
        if source.id.is_empty() {
            return Err(AnalyticsError::InvalidArgument("source has no id".to_string()));
        }

        let source = Arc::new(source);
        let mut state = lock(&self.state);

        if !state.sources.contains_key(&source.id) && state.sources.len() >= self.max_sources {
            if let Some((oldest, _)) = state.sources.shift_remove_index(0) {
                tracing::info!("Evicting source {} to make room for {}", oldest, source.id);
            }
        }

        state.sources.insert(source.id.clone(), Arc::clone(&source));
        Ok(source)
    }

    /// Fetch a trial, flatten its metadata and register it. Always hits the
    /// data source so a re-opened trial picks up server-side changes.
    pub async fn load_trial(&self, id: &str) -> AnalyticsResult<Option<Arc<Trial>>> {
        let payload = self
            .api
            .query_trial(id)
            .await
            .map_err(AnalyticsError::from_source)?;

        let Some(payload) = payload else {
            tracing::debug!("Trial {} not found", id);
            return Ok(None);
        };

        let trial = Trial::from_payload(payload)?;
        tracing::info!("Loaded trial {}", trial.id);
        self.add_trial(trial).map(Some)
    }

    pub async fn load_source(&self, id: &str) -> AnalyticsResult<Option<Arc<Source>>> {
        if let Some(source) = self.source(id) {
            return Ok(Some(source));
        }

        let payload = self
            .api
            .query_source(id)
            .await
            .map_err(AnalyticsError::from_source)?;

        match payload {
            Some(payload) => self.add_source(Source::from_payload(payload)?).map(Some),
            None => {
                tracing::debug!("Source {} not found", id);
                Ok(None)
            }
        }
    }

    /// Load the trial the server picks as default for `source_id`.
    pub async fn load_default_trial_for_source(&self, source_id: &str) -> AnalyticsResult<Option<Arc<Trial>>> {
        let trial_id = self
            .api
            .query_default_trial_of_source(source_id)
            .await
            .map_err(AnalyticsError::from_source)?;

        match trial_id {
            Some(id) if !id.is_empty() => self.load_trial(&id).await,
            _ => Ok(None),
        }
    }

    pub fn remove_trial(&self, id: &str) {
        lock(&self.state).drop_trial(id);
        self.datasets.clear_dataset(id);
        tracing::debug!("Removed trial {}", id);
    }

    pub fn clear_storage(&self) {
        {
            let mut state = lock(&self.state);
            state.trials.clear();
            state.trial_order.clear();
            state.sources.clear();
        }
        self.datasets.clear_all_datasets();
        tracing::info!("Cleared trial storage");
    }

    pub fn trial(&self, id: &str) -> Option<Arc<Trial>> {
        lock(&self.state).trials.get(id).cloned()
    }

    pub fn source(&self, id: &str) -> Option<Arc<Source>> {
        lock(&self.state).sources.get(id).cloned()
    }

    /// Registered trial ids, newest first.
    pub fn trial_ids(&self) -> Vec<String> {
        lock(&self.state).trial_order.iter().cloned().collect()
    }

    /// Registered source ids, oldest first.
    pub fn source_ids(&self) -> Vec<String> {
        lock(&self.state).sources.keys().cloned().collect()
    }
}

fn lock(state: &Mutex<RegistryState>) -> MutexGuard<'_, RegistryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
