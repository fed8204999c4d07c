// Chart series domain models
use serde::{Deserialize, Serialize};

use super::variant::VariantKind;

pub const DEFAULT_FIELD: &str = "count";
pub const DEFAULT_BORDER_COLOR: &str = "#000";
pub const DEFAULT_TENSION: f64 = 0.4;

/// A series as requested by the caller; unset attributes get defaults when
/// it is added to a chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeriesDraft {
    pub label: String,
    pub variant: Option<VariantKind>,
    pub field: Option<String>,
    pub border_color: Option<String>,
    pub tension: Option<f64>,
    pub data: Option<Vec<f64>>,
    pub hidden: Option<bool>,
    pub display_name: Option<String>,
    pub show_as_negative: bool,
}

impl ChartSeriesDraft {
    pub fn new(label: impl Into<String>, variant: Option<VariantKind>, field: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant,
            field: Some(field.into()),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Vec<f64>) -> Self {
        self.data = Some(data);
        self
    }
}

/// A plotted series. Holds its own copy of the values, so it outlives cache eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantKind>,
    pub field: String,
    pub border_color: String,
    pub tension: f64,
    pub data: Vec<f64>,
    pub hidden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub show_as_negative: bool,
}

impl ChartSeries {
    pub fn matches(&self, variant: Option<VariantKind>, label: &str, field: &str) -> bool {
        self.variant == variant && self.label == label && self.field == field
    }

    /// Copy as the chart library should draw it.
    pub fn to_render(&self) -> RenderSeries {
        let data = if self.show_as_negative {
            self.data.iter().map(|v| -v).collect()
        } else {
            self.data.clone()
        };

        RenderSeries {
            label: self.display_name.clone().unwrap_or_else(|| self.label.clone()),
            border_color: self.border_color.clone(),
            tension: self.tension,
            data,
            hidden: self.hidden,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSeries {
    pub label: String,
    pub border_color: String,
    pub tension: f64,
    pub data: Vec<f64>,
    pub hidden: bool,
}
