// Data source trait for trial analytics
use crate::domain::trial::TrialIngest;
use async_trait::async_trait;
use serde_json::Value;

/// Remote analytics API. Query methods return `Ok(None)` when the server has
/// nothing under the requested id.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Execution status of a submitted trial
    async fn query_execution_status(&self, id: &str) -> anyhow::Result<Option<Value>>;

    async fn query_source(&self, id: &str) -> anyhow::Result<Option<Value>>;

    async fn query_modlist(&self, id: &str) -> anyhow::Result<Option<Value>>;

    async fn query_trial(&self, id: &str) -> anyhow::Result<Option<Value>>;

    /// Raw telemetry for one category of a trial, e.g. `data_item` or `data_all`
    async fn query_data(&self, id: &str, category: &str) -> anyhow::Result<Option<Value>>;

    async fn query_largest_trial_of_source(&self, source_id: &str) -> anyhow::Result<Value>;

    /// Id of the default trial for a source, if the server has one
    async fn query_default_trial_of_source(&self, source_id: &str) -> anyhow::Result<Option<String>>;

    /// Validity check for a source or trial id
    async fn check_source(&self, id: &str) -> anyhow::Result<Value>;

    async fn submit_source(&self, text: &str) -> anyhow::Result<Value>;

    async fn submit_trial(&self, params: &TrialIngest) -> anyhow::Result<Value>;

    /// Submit a blueprint string for a quick default run
    async fn submit_quick_source(&self, blueprint: &str) -> anyhow::Result<Value>;
}
