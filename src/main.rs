// Main entry point - Dependency injection and a single chart render
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use trial_analytics::application::plot_service::PlotRequest;
use trial_analytics::domain::variant::VariantKind;
use trial_analytics::infrastructure::config::load_analytics_config;
use trial_analytics::infrastructure::http_source::HttpAnalyticsSource;
use trial_analytics::presentation::app_state::AppState;
use trial_analytics::presentation::chart_payload::ChartPayload;

const USAGE: &str = "usage: trial-analytics <trial-id> [variant] [label] [field]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let trial_id = args.next().context(USAGE)?;
    let variant: VariantKind = args.next().as_deref().unwrap_or("item").parse()?;
    let label = args.next();
    let field = args.next().unwrap_or_else(|| match variant {
        VariantKind::Item | VariantKind::Electric => "prod".to_string(),
        _ => "count".to_string(),
    });

    // Load configuration
    let config = load_analytics_config()?;

    // Create data source (infrastructure layer)
    let api = Arc::new(HttpAnalyticsSource::new(
        config.api.base_url.clone(),
        config.api.dev_mode,
    ));

    let mut state = AppState::new(&config, api);

    let trial = state
        .registry
        .load_trial(&trial_id)
        .await?
        .with_context(|| format!("trial {} not found", trial_id))?;

    // Without an explicit label, plot the first one the dataset reports
    let label = match (label, trial.tick_interval) {
        (Some(label), _) => Some(label),
        (None, Some(interval)) => state
            .registry
            .datasets()
            .load_dataset(&trial.id, variant, interval)
            .await?
            .and_then(|series| series.labels().first().map(|l| l.to_string())),
        (None, None) => None,
    };

    state
        .chart
        .set_title(format!("{} - trial {}", config.chart.title, trial.id));

    let request = PlotRequest::new(trial.id.clone(), variant, label, field).smoothed(state.smoothing_window);
    let labels = state
        .plot_service
        .chart_trial(&mut state.chart, &request)
        .await?
        .with_context(|| format!("no {} data for trial {}", variant, trial.id))?;

    println!("{}", ChartPayload::from_chart(&state.chart, labels).to_json()?);
    Ok(())
}
