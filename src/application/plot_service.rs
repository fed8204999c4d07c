// Plot service - turns a cached variant dataset into a chart series
use crate::application::chart_assembly::ChartAssembly;
use crate::application::smoothing::{get_labels, smooth, ticks_to_minutes};
use crate::application::trial_registry::TrialRegistry;
use crate::domain::chart::ChartSeriesDraft;
use crate::domain::error::{AnalyticsError, AnalyticsResult};
use crate::domain::variant::VariantKind;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotRequest {
    pub trial_id: String,
    pub variant: VariantKind,
    /// Record label to plot; `None` plots every record of the dataset.
    pub label: Option<String>,
    pub field: String,
    pub smoothing_window: usize,
    pub show_as_negative: bool,
}

impl PlotRequest {
    pub fn new(trial_id: impl Into<String>, variant: VariantKind, label: Option<String>, field: impl Into<String>) -> Self {
        Self {
            trial_id: trial_id.into(),
            variant,
            label,
            field: field.into(),
            smoothing_window: 1,
            show_as_negative: false,
        }
    }

    pub fn smoothed(mut self, window: usize) -> Self {
        self.smoothing_window = window;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Plot {
    pub draft: ChartSeriesDraft,
    /// Minute position of every value in `draft.data`.
    pub x: Vec<f64>,
    /// Minute marks for the whole trial, one per sampling interval.
    pub labels: Vec<f64>,
}

#[derive(Clone)]
pub struct PlotService {
    registry: Arc<TrialRegistry>,
}

impl PlotService {
    pub fn new(registry: Arc<TrialRegistry>) -> Self {
        Self { registry }
    }

    /// Build a plot from the trial's dataset, loading the trial and the
    /// dataset on demand. `Ok(None)` when either does not exist.
    pub async fn plot(&self, request: &PlotRequest) -> AnalyticsResult<Option<Plot>> {
        let trial = match self.registry.trial(&request.trial_id) {
            Some(trial) => trial,
            None => match self.registry.load_trial(&request.trial_id).await? {
                Some(trial) => trial,
                None => return Ok(None),
            },
        };

        let interval = trial.tick_interval.ok_or_else(|| {
            AnalyticsError::MissingData(format!("trial {} has no tick interval", trial.id))
        })?;

        let Some(series) = self
            .registry
            .datasets()
            .load_dataset(&trial.id, request.variant, interval)
            .await?
        else {
            return Ok(None);
        };

        let (ticks, values) = series.points(request.label.as_deref(), &request.field);
        let smoothed = smooth(&ticks, &values, request.smoothing_window);
        tracing::debug!(
            "Plotting {} {} of trial {}: {} points",
            request.variant,
            request.field,
            trial.id,
            smoothed.y.len()
        );

        let length = trial
            .length
            .or_else(|| series.records.last().map(|r| r.tick))
            .unwrap_or(0);

        let draft = ChartSeriesDraft {
            label: request
                .label
                .clone()
                .unwrap_or_else(|| request.variant.to_string()),
            variant: Some(request.variant),
            field: Some(request.field.clone()),
            data: Some(smoothed.y),
            show_as_negative: request.show_as_negative,
            ..ChartSeriesDraft::default()
        };

        Ok(Some(Plot {
            draft,
            x: smoothed.x.into_iter().map(ticks_to_minutes).collect(),
            labels: get_labels(interval, length),
        }))
    }

    /// Plot and append the series to `chart`. Returns the plot's minute
    /// labels, or `None` when there was nothing to plot.
    pub async fn chart_trial(&self, chart: &mut ChartAssembly, request: &PlotRequest) -> AnalyticsResult<Option<Vec<f64>>> {
        match self.plot(request).await? {
            Some(plot) => {
                chart.add_dataset_to_chart(plot.draft)?;
                Ok(Some(plot.labels))
            }
            None => Ok(None),
        }
    }
}
