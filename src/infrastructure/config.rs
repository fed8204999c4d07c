use serde::Deserialize;

use crate::application::dataset_cache::DEFAULT_MAX_DATASETS;
use crate::application::trial_registry::{DEFAULT_MAX_SOURCES, DEFAULT_MAX_TRIALS};

const CONFIG_FILE: &str = "config/analytics";
const ENV_PREFIX: &str = "TRIAL_ANALYTICS";

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalyticsConfig {
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub chart: ChartSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiSettings {
    pub base_url: String,
    /// Prefix every request path with `/api`, as the dev proxy expects.
    pub dev_mode: bool,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CacheSettings {
    pub max_datasets: usize,
    pub max_trials: usize,
    pub max_sources: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChartSettings {
    pub title: String,
    pub smoothing_window: usize,
}

pub fn load_analytics_config() -> anyhow::Result<AnalyticsConfig> {
    load_analytics_config_from(CONFIG_FILE)
}

/// Defaults, overridden by the optional file at `path`, overridden by
/// `TRIAL_ANALYTICS__SECTION__KEY` environment variables.
pub fn load_analytics_config_from(path: &str) -> anyhow::Result<AnalyticsConfig> {
    let settings = config::Config::builder()
        .set_default("api.base_url", "http://localhost:3000")?
        .set_default("api.dev_mode", false)?
        .set_default("cache.max_datasets", DEFAULT_MAX_DATASETS as u64)?
        .set_default("cache.max_trials", DEFAULT_MAX_TRIALS as u64)?
        .set_default("cache.max_sources", DEFAULT_MAX_SOURCES as u64)?
        .set_default("chart.title", "Trial analytics")?
        .set_default("chart.smoothing_window", 1u64)?
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
