// In-memory analytics source for tests
use crate::application::analytics_source::AnalyticsSource;
use crate::domain::trial::TrialIngest;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct FakeSource {
    trials: Mutex<HashMap<String, Value>>,
    sources: Mutex<HashMap<String, Value>>,
    data: Mutex<HashMap<(String, String), Value>>,
    default_trials: Mutex<HashMap<String, String>>,
    failing: Mutex<bool>,
    delay: Option<Duration>,
    pub data_calls: AtomicUsize,
    pub trial_calls: AtomicUsize,
    pub source_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every data query sleeps for `delay` before answering.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn with_trial(self, trial: Value) -> Self {
        let id = trial["id"].as_str().unwrap_or_default().to_string();
        self.trials.lock().unwrap().insert(id, trial);
        self
    }

    pub fn with_source(self, source: Value) -> Self {
        let id = source["id"].as_str().unwrap_or_default().to_string();
        self.sources.lock().unwrap().insert(id, source);
        self
    }

    pub fn with_data(self, trial_id: &str, category: &str, payload: Value) -> Self {
        self.data
            .lock()
            .unwrap()
            .insert((trial_id.to_string(), category.to_string()), payload);
        self
    }

    pub fn with_default_trial(self, source_id: &str, trial_id: &str) -> Self {
        self.default_trials
            .lock()
            .unwrap()
            .insert(source_id.to_string(), trial_id.to_string());
        self
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn data_calls(&self) -> usize {
        self.data_calls.load(Ordering::SeqCst)
    }
}

/// A `{ "data": [...] }` payload with one record per sample, carrying every
/// rate field so it ingests under any variant.
pub fn sample_payload(label: &str, prod: &[f64]) -> Value {
    let data: Vec<Value> = prod
        .iter()
        .enumerate()
        .map(|(i, p)| json!({ "tick": (i as u64 + 1) * 60, "label": label, "cons": 0.0, "prod": p, "count": p }))
        .collect();
    json!({ "data": data })
}

#[async_trait]
impl AnalyticsSource for FakeSource {
    async fn query_execution_status(&self, id: &str) -> anyhow::Result<Option<Value>> {
        Ok(Some(json!({ "id": id, "status": "complete" })))
    }

    async fn query_source(&self, id: &str) -> anyhow::Result<Option<Value>> {
        self.source_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sources.lock().unwrap().get(id).cloned())
    }

    async fn query_modlist(&self, _id: &str) -> anyhow::Result<Option<Value>> {
        Ok(None)
    }

    async fn query_trial(&self, id: &str) -> anyhow::Result<Option<Value>> {
        self.trial_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.trials.lock().unwrap().get(id).cloned())
    }

    async fn query_data(&self, id: &str, category: &str) -> anyhow::Result<Option<Value>> {
        self.data_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if *self.failing.lock().unwrap() {
            anyhow::bail!("connection refused");
        }
        Ok(self
            .data
            .lock()
            .unwrap()
            .get(&(id.to_string(), category.to_string()))
            .cloned())
    }

    async fn query_largest_trial_of_source(&self, source_id: &str) -> anyhow::Result<Value> {
        Ok(json!({ "source": source_id }))
    }

    async fn query_default_trial_of_source(&self, source_id: &str) -> anyhow::Result<Option<String>> {
        Ok(self.default_trials.lock().unwrap().get(source_id).cloned())
    }

    async fn check_source(&self, id: &str) -> anyhow::Result<Value> {
        Ok(json!({ "id": id, "valid": true }))
    }

    async fn submit_source(&self, _text: &str) -> anyhow::Result<Value> {
        Ok(json!({ "accepted": true }))
    }

    async fn submit_trial(&self, params: &TrialIngest) -> anyhow::Result<Value> {
        Ok(json!({ "accepted": true, "source": params.source }))
    }

    async fn submit_quick_source(&self, _blueprint: &str) -> anyhow::Result<Value> {
        Ok(json!({ "accepted": true }))
    }
}
