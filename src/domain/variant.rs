// Telemetry variant kinds tracked per trial
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::AnalyticsError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Item,
    Electric,
    Circuit,
    Pollution,
    System,
}

impl VariantKind {
    pub const ALL: [VariantKind; 5] = [
        VariantKind::Item,
        VariantKind::Electric,
        VariantKind::Circuit,
        VariantKind::Pollution,
        VariantKind::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Item => "item",
            VariantKind::Electric => "electric",
            VariantKind::Circuit => "circuit",
            VariantKind::Pollution => "pollution",
            VariantKind::System => "system",
        }
    }

    /// Data-source category the variant is fetched from, e.g. `data_item`.
    pub fn category(&self) -> String {
        format!("data_{}", self.as_str())
    }

    /// Measurement fields converted to a per-minute rate on ingestion.
    /// Empty for variants whose records pass through unmodified.
    pub fn rate_fields(&self) -> &'static [&'static str] {
        match self {
            VariantKind::Item | VariantKind::Electric => &["cons", "prod"],
            VariantKind::Pollution => &["count"],
            VariantKind::Circuit | VariantKind::System => &[],
        }
    }

    pub fn is_rate_normalized(&self) -> bool {
        !self.rate_fields().is_empty()
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VariantKind::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| AnalyticsError::InvalidArgument(format!("unknown variant '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_parse() {
        assert_eq!(VariantKind::Pollution.category(), "data_pollution");
        assert_eq!("circuit".parse::<VariantKind>().unwrap(), VariantKind::Circuit);
        assert!(matches!(
            "power".parse::<VariantKind>(),
            Err(AnalyticsError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rate_fields() {
        assert_eq!(VariantKind::Item.rate_fields(), &["cons", "prod"]);
        assert_eq!(VariantKind::Pollution.rate_fields(), &["count"]);
        assert!(!VariantKind::System.is_rate_normalized());
        assert!(!VariantKind::Circuit.is_rate_normalized());
    }
}
