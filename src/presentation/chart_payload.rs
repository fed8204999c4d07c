// Render-ready chart payload for the charting library
use crate::application::chart_assembly::ChartAssembly;
use crate::domain::chart::RenderSeries;
use crate::domain::chart_options::ChartOptions;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ChartPayload {
    /// X axis in minutes
    pub labels: Vec<f64>,
    pub datasets: Vec<RenderSeries>,
    pub options: ChartOptions,
}

impl ChartPayload {
    pub fn from_chart(chart: &ChartAssembly, labels: Vec<f64>) -> Self {
        Self {
            labels,
            datasets: chart.render_series(),
            options: chart.snapshot_options(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartSeriesDraft;
    use crate::domain::variant::VariantKind;

    #[test]
    fn test_payload_json() {
        let mut chart = ChartAssembly::new("Trial t1");
        let mut draft = ChartSeriesDraft::new("gear", Some(VariantKind::Item), "cons").with_data(vec![1.5]);
        draft.show_as_negative = true;
        draft.hidden = Some(true);
        chart.add_dataset_to_chart(draft).unwrap();

        let payload = ChartPayload::from_chart(&chart, vec![0.0, 1.0]);
        let value: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(value["labels"], serde_json::json!([0.0, 1.0]));
        assert_eq!(value["datasets"][0]["borderColor"], "#000");
        assert_eq!(value["datasets"][0]["data"][0], -1.5);
        assert_eq!(value["datasets"][0]["hidden"], true);
        assert_eq!(value["options"]["plugins"]["title"]["text"], "Trial t1");
    }
}
