// Telemetry data domain models
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AnalyticsError, AnalyticsResult};
use super::variant::VariantKind;

/// Scale applied to per-tick values when converting to a per-minute rate.
pub const RATE_SCALE: f64 = 60.0;

/// Cache address of one variant dataset of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub trial_id: String,
    pub variant: VariantKind,
}

impl SeriesKey {
    pub fn new(trial_id: impl Into<String>, variant: VariantKind) -> Self {
        Self {
            trial_id: trial_id.into(),
            variant,
        }
    }
}

/// One sampled tick. `tick` and `label` are common to every variant; the
/// measurement fields depend on the variant and are kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl TickRecord {
    pub fn value(&self, field: &str) -> Option<f64> {
        self.fields.get(field).and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantSeries {
    pub trial_id: String,
    pub variant: VariantKind,
    pub records: Vec<TickRecord>,
}

impl VariantSeries {
    pub fn new(trial_id: String, variant: VariantKind, records: Vec<TickRecord>) -> Self {
        Self {
            trial_id,
            variant,
            records,
        }
    }

    /// Build a series from a raw `{ "data": [...] }` payload.
    ///
    /// Rate variants keep only `tick`, `label` and their rate fields, each
    /// converted to a per-minute rate: `value / interval * 60`.
    pub fn ingest(
        trial_id: &str,
        variant: VariantKind,
        payload: &Value,
        interval: u64,
    ) -> AnalyticsResult<Self> {
        let raw = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                AnalyticsError::Payload(format!(
                    "{} payload for trial {} has no data array",
                    variant, trial_id
                ))
            })?;

        let records = raw
            .iter()
            .map(|entry| {
                serde_json::from_value::<TickRecord>(entry.clone()).map_err(|e| {
                    AnalyticsError::Payload(format!("{} record for trial {}: {}", variant, trial_id, e))
                })
            })
            .collect::<AnalyticsResult<Vec<_>>>()?;

        if !variant.is_rate_normalized() {
            return Ok(Self::new(trial_id.to_string(), variant, records));
        }

        if interval == 0 {
            return Err(AnalyticsError::InvalidArgument(
                "sampling interval must be greater than zero".to_string(),
            ));
        }

        let records = records
            .into_iter()
            .map(|record| to_rate(record, variant, interval))
            .collect::<AnalyticsResult<Vec<_>>>()?;

        Ok(Self::new(trial_id.to_string(), variant, records))
    }

    /// Distinct record labels in first-seen order.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for label in self.records.iter().filter_map(|r| r.label.as_deref()) {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        labels
    }

    /// Tick and value pairs of `field` for records carrying `label`, or for
    /// every record when `label` is `None`. Records without the field are skipped.
    pub fn points(&self, label: Option<&str>, field: &str) -> (Vec<f64>, Vec<f64>) {
        self.records
            .iter()
            .filter(|r| label.is_none() || r.label.as_deref() == label)
            .filter_map(|r| r.value(field).map(|v| (r.tick as f64, v)))
            .unzip()
    }
}

fn to_rate(record: TickRecord, variant: VariantKind, interval: u64) -> AnalyticsResult<TickRecord> {
    let mut fields = Map::new();
    for field in variant.rate_fields() {
        let raw = record.value(field).ok_or_else(|| {
            AnalyticsError::Payload(format!(
                "{} record at tick {} has no numeric '{}'",
                variant, record.tick, field
            ))
        })?;
        let rate = raw / interval as f64 * RATE_SCALE;
        fields.insert(field.to_string(), Value::from(rate));
    }

    Ok(TickRecord {
        tick: record.tick,
        label: record.label,
        fields,
    })
}
