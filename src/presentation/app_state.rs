// Application state for the chart front end
use crate::application::analytics_source::AnalyticsSource;
use crate::application::chart_assembly::ChartAssembly;
use crate::application::dataset_cache::DatasetCache;
use crate::application::plot_service::PlotService;
use crate::application::trial_registry::TrialRegistry;
use crate::infrastructure::config::AnalyticsConfig;
use std::sync::Arc;

pub struct AppState {
    pub registry: Arc<TrialRegistry>,
    pub plot_service: PlotService,
    pub chart: ChartAssembly,
    pub smoothing_window: usize,
}

impl AppState {
    pub fn new(config: &AnalyticsConfig, api: Arc<dyn AnalyticsSource>) -> Self {
        let datasets = Arc::new(DatasetCache::new(api.clone(), config.cache.max_datasets));
        let registry = Arc::new(TrialRegistry::new(
            api,
            datasets,
            config.cache.max_trials,
            config.cache.max_sources,
        ));

        Self {
            plot_service: PlotService::new(registry.clone()),
            registry,
            chart: ChartAssembly::new(config.chart.title.clone()),
            smoothing_window: config.chart.smoothing_window,
        }
    }
}
