// Chart configuration consumed by the rendering library
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: PluginOptions,
    pub scales: ScaleOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginOptions {
    pub legend: LegendOptions,
    pub title: TitleOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendOptions {
    pub display: bool,
    pub labels: LabelFont,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelFont {
    pub font: FontOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontOptions {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleOptions {
    pub display: bool,
    pub text: String,
    pub font: FontOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleOptions {
    pub x: AxisOptions,
    pub y: AxisOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisOptions {
    #[serde(rename = "type")]
    pub kind: String,
    pub position: String,
    pub title: TitleOptions,
    pub ticks: TickOptions,
    pub grid: GridOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickOptions {
    pub precision: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridOptions {
    pub color: String,
}

impl ChartOptions {
    pub fn with_title(title: impl Into<String>) -> Self {
        let axis = |kind: &str, position: &str, text: &str, precision: u32| AxisOptions {
            kind: kind.to_string(),
            position: position.to_string(),
            title: TitleOptions {
                display: true,
                text: text.to_string(),
                font: FontOptions { size: 14 },
            },
            ticks: TickOptions { precision },
            grid: GridOptions {
                color: "rgba(128, 128, 128, 0.2)".to_string(),
            },
        };

        Self {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: PluginOptions {
                legend: LegendOptions {
                    display: true,
                    labels: LabelFont {
                        font: FontOptions { size: 12 },
                    },
                },
                title: TitleOptions {
                    display: true,
                    text: title.into(),
                    font: FontOptions { size: 18 },
                },
            },
            scales: ScaleOptions {
                x: axis("linear", "bottom", "Minutes", 2),
                y: axis("linear", "left", "Per minute", 1),
            },
        }
    }
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self::with_title("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_for_chart_library() {
        let value = serde_json::to_value(ChartOptions::with_title("Iron")).unwrap();
        assert_eq!(value["plugins"]["title"]["text"], "Iron");
        assert_eq!(value["scales"]["x"]["type"], "linear");
        assert_eq!(value["maintainAspectRatio"], false);
    }
}
