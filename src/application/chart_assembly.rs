// Chart assembly - ordered list of plotted series plus the chart options
use crate::domain::chart::{
    ChartSeries, ChartSeriesDraft, RenderSeries, DEFAULT_BORDER_COLOR, DEFAULT_FIELD, DEFAULT_TENSION,
};
use crate::domain::chart_options::ChartOptions;
use crate::domain::error::{AnalyticsError, AnalyticsResult};
use crate::domain::variant::VariantKind;

#[derive(Debug, Clone, Default)]
pub struct ChartAssembly {
    series: Vec<ChartSeries>,
    options: ChartOptions,
}

impl ChartAssembly {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            series: Vec::new(),
            options: ChartOptions::with_title(title),
        }
    }

    /// Append a series. The caller supplies the values; nothing is fetched here.
    /// Duplicates of an already plotted series are allowed.
    pub fn add_dataset_to_chart(&mut self, draft: ChartSeriesDraft) -> AnalyticsResult<()> {
        if draft.label.is_empty() {
            return Err(AnalyticsError::InvalidArgument(
                "chart series needs a label".to_string(),
            ));
        }

        let data = match draft.data {
            Some(data) if !data.is_empty() => data,
            _ => {
                return Err(AnalyticsError::MissingData(format!(
                    "series '{}' has no data; load the dataset first",
                    draft.label
                )));
            }
        };

        let series = ChartSeries {
            label: draft.label,
            variant: draft.variant,
            field: draft.field.unwrap_or_else(|| DEFAULT_FIELD.to_string()),
            border_color: draft
                .border_color
                .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
            tension: draft.tension.unwrap_or(DEFAULT_TENSION),
            data,
            hidden: draft.hidden.unwrap_or(false),
            display_name: draft.display_name,
            show_as_negative: draft.show_as_negative,
        };

        tracing::debug!("Charting {} {} ({} points)", series.label, series.field, series.data.len());
        self.series.push(series);
        Ok(())
    }

    /// Remove every series plotted for `(variant, label, field)`.
    pub fn remove_dataset_from_chart(&mut self, variant: Option<VariantKind>, label: &str, field: &str) {
        let before = self.series.len();
        self.series.retain(|s| !s.matches(variant, label, field));
        tracing::debug!("Removed {} series for {}", before - self.series.len(), label);
    }

    pub fn clear_chart(&mut self) {
        self.series.clear();
    }

    pub fn series(&self) -> &[ChartSeries] {
        &self.series
    }

    pub fn render_series(&self) -> Vec<RenderSeries> {
        self.series.iter().map(ChartSeries::to_render).collect()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.options.plugins.title.text = title.into();
    }

    pub fn snapshot_options(&self) -> ChartOptions {
        self.options.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(label: &str, field: &str, data: Vec<f64>) -> ChartSeriesDraft {
        ChartSeriesDraft::new(label, Some(VariantKind::Item), field).with_data(data)
    }

    #[test]
    fn test_add_applies_defaults() {
        let mut chart = ChartAssembly::new("Trial");
        let series = ChartSeriesDraft {
            label: "pollution".into(),
            variant: Some(VariantKind::Pollution),
            data: Some(vec![1.0, 2.0]),
            ..ChartSeriesDraft::default()
        };

        chart.add_dataset_to_chart(series).unwrap();

        let added = &chart.series()[0];
        assert_eq!(added.field, "count");
        assert_eq!(added.border_color, "#000");
        assert_eq!(added.tension, 0.4);
        assert!(!added.hidden);
    }

    #[test]
    fn test_add_rejects_invalid_drafts() {
        let mut chart = ChartAssembly::default();

        let unlabeled = ChartSeriesDraft::default().with_data(vec![1.0]);
        assert!(matches!(
            chart.add_dataset_to_chart(unlabeled),
            Err(AnalyticsError::InvalidArgument(_))
        ));

        let no_data = ChartSeriesDraft::new("gear", Some(VariantKind::Item), "prod");
        assert!(matches!(
            chart.add_dataset_to_chart(no_data),
            Err(AnalyticsError::MissingData(_))
        ));
        assert!(matches!(
            chart.add_dataset_to_chart(draft("gear", "prod", vec![])),
            Err(AnalyticsError::MissingData(_))
        ));
        assert!(chart.series().is_empty());
    }

    #[test]
    fn test_remove_matches_full_triple() {
        let mut chart = ChartAssembly::default();
        chart.add_dataset_to_chart(draft("gear", "prod", vec![1.0])).unwrap();
        chart.add_dataset_to_chart(draft("gear", "cons", vec![2.0])).unwrap();
        chart.add_dataset_to_chart(draft("gear", "prod", vec![3.0])).unwrap();
        chart.add_dataset_to_chart(draft("plate", "prod", vec![4.0])).unwrap();

        chart.remove_dataset_from_chart(Some(VariantKind::Item), "gear", "prod");

        let left: Vec<_> = chart.series().iter().map(|s| (s.label.as_str(), s.field.as_str())).collect();
        assert_eq!(left, vec![("gear", "cons"), ("plate", "prod")]);
    }

    #[test]
    fn test_remove_without_match_keeps_order() {
        let mut chart = ChartAssembly::default();
        chart.add_dataset_to_chart(draft("b", "prod", vec![1.0])).unwrap();
        chart.add_dataset_to_chart(draft("a", "prod", vec![2.0])).unwrap();
        let before = chart.series().to_vec();

        chart.remove_dataset_from_chart(Some(VariantKind::Electric), "a", "prod");
        chart.remove_dataset_from_chart(Some(VariantKind::Item), "a", "count");

        assert_eq!(chart.series(), before.as_slice());
    }

    #[test]
    fn test_clear_and_render() {
        let mut chart = ChartAssembly::default();
        let mut negative = draft("gear", "cons", vec![1.0, 2.0]);
        negative.show_as_negative = true;
        negative.display_name = Some("Gear consumption".into());
        chart.add_dataset_to_chart(negative).unwrap();

        let rendered = chart.render_series();
        assert_eq!(rendered[0].label, "Gear consumption");
        assert_eq!(rendered[0].data, vec![-1.0, -2.0]);
        assert_eq!(chart.series()[0].data, vec![1.0, 2.0]);

        chart.clear_chart();
        assert!(chart.series().is_empty());
    }

    #[test]
    fn test_title_is_set_explicitly() {
        let mut chart = ChartAssembly::new("First");
        let before = chart.snapshot_options();

        chart.set_title("Second");

        assert_eq!(before.plugins.title.text, "First");
        assert_eq!(chart.snapshot_options().plugins.title.text, "Second");
        assert_eq!(chart.snapshot_options(), chart.snapshot_options());
    }
}
