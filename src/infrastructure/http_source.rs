// HTTP implementation of the analytics data source
use crate::application::analytics_source::AnalyticsSource;
use crate::domain::trial::TrialIngest;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

const DEV_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct HttpAnalyticsSource {
    base_url: String,
    dev_mode: bool,
    client: reqwest::Client,
}

impl HttpAnalyticsSource {
    pub fn new(base_url: String, dev_mode: bool) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            dev_mode,
            client: reqwest::Client::new(),
        }
    }

    fn build_url(&self, path: &str) -> String {
        let prefix = if self.dev_mode { DEV_PREFIX } else { "" };
        format!("{}{}{}", self.base_url, prefix, path)
    }

    fn query_path(id: &str, endpoint: &str) -> String {
        format!("/query/{}/{}", urlencoding::encode(id), urlencoding::encode(endpoint))
    }

    fn analysis_path(endpoint: &str, source_id: &str) -> String {
        format!("/analysis/{}/{}", endpoint, urlencoding::encode(source_id))
    }

    async fn get(&self, path: &str) -> Result<Option<reqwest::Response>> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed with status {}: {}", path, status, body);
        }

        Ok(Some(response))
    }

    async fn get_json(&self, path: &str) -> Result<Option<Value>> {
        match self.get(path).await? {
            Some(response) => {
                let value = response
                    .json::<Value>()
                    .await
                    .with_context(|| format!("Failed to parse response of {}", path))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn get_required_json(&self, path: &str) -> Result<Value> {
        self.get_json(path)
            .await?
            .with_context(|| format!("{} returned not found", path))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.build_url(path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("POST {} failed with status {}: {}", path, status, body);
        }

        response
            .json::<Value>()
            .await
            .with_context(|| format!("Failed to parse response of {}", path))
    }
}

#[async_trait]
impl AnalyticsSource for HttpAnalyticsSource {
    async fn query_execution_status(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(&Self::query_path(id, "status")).await
    }

    async fn query_source(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(&Self::query_path(id, "source")).await
    }

    async fn query_modlist(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(&Self::query_path(id, "modlist")).await
    }

    async fn query_trial(&self, id: &str) -> Result<Option<Value>> {
        self.get_json(&Self::query_path(id, "trial")).await
    }

    async fn query_data(&self, id: &str, category: &str) -> Result<Option<Value>> {
        self.get_json(&Self::query_path(id, category)).await
    }

    async fn query_largest_trial_of_source(&self, source_id: &str) -> Result<Value> {
        self.get_required_json(&Self::analysis_path("largestTrialForSource", source_id))
            .await
    }

    async fn query_default_trial_of_source(&self, source_id: &str) -> Result<Option<String>> {
        let path = Self::analysis_path("defaultTrialForSource", source_id);
        let Some(response) = self.get(&path).await? else {
            return Ok(None);
        };

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response of {}", path))?;
        let id = text.trim();
        Ok((!id.is_empty()).then(|| id.to_string()))
    }

    async fn check_source(&self, id: &str) -> Result<Value> {
        self.get_required_json(&format!("/check/{}", urlencoding::encode(id)))
            .await
    }

    async fn submit_source(&self, text: &str) -> Result<Value> {
        self.post_json("/submit", &json!({ "variant": "source", "source": text }))
            .await
    }

    async fn submit_trial(&self, params: &TrialIngest) -> Result<Value> {
        self.post_json("/submit", &json!({ "variant": "trial", "trial": params }))
            .await
    }

    async fn submit_quick_source(&self, blueprint: &str) -> Result<Value> {
        self.post_json("/quickSubmit", &json!({ "blueprintStr": blueprint }))
            .await
    }
}
