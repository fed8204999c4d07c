// Application layer - Use cases over the analytics data source
pub mod analytics_source;
pub mod chart_assembly;
pub mod dataset_cache;
pub mod plot_service;
pub mod smoothing;
pub mod trial_registry;

#[cfg(test)]
pub(crate) mod test_support;
