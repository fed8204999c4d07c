// Trial and source domain models
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{AnalyticsError, AnalyticsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataValue {
    pub key: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemMetadata {
    pub avg: Vec<MetadataValue>,
    pub total: Vec<MetadataValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemMetadataRow {
    pub key: String,
    pub min: f64,
    pub avg: Option<f64>,
    pub max: Option<f64>,
}

/// A simulation run, with its metadata already flattened into rows for charting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trial {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_metadata: Option<ItemMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_metadata: Option<Vec<SystemMetadataRow>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Trial {
    pub fn new(id: impl Into<String>, source: Option<String>) -> Self {
        Self {
            id: id.into(),
            source,
            ..Self::default()
        }
    }

    /// Decode a trial payload, turning the keyed metadata objects into ordered rows.
    pub fn from_payload(payload: Value) -> AnalyticsResult<Self> {
        let raw: RawTrial = serde_json::from_value(payload)
            .map_err(|e| AnalyticsError::Payload(format!("trial: {}", e)))?;

        let item_metadata = raw.item_metadata.map(|meta| ItemMetadata {
            avg: to_rows(meta.avg),
            total: to_rows(meta.total),
        });

        let system_metadata = raw.system_metadata.map(|meta| {
            meta.min
                .into_iter()
                .map(|(key, min)| SystemMetadataRow {
                    avg: meta.avg.get(&key).copied(),
                    max: meta.max.get(&key).copied(),
                    key,
                    min,
                })
                .collect()
        });

        Ok(Self {
            id: raw.id,
            source: raw.source,
            tick_interval: raw.tick_interval,
            length: raw.length,
            item_metadata,
            system_metadata,
            extra: raw.extra,
        })
    }
}

fn to_rows(values: IndexMap<String, f64>) -> Vec<MetadataValue> {
    values
        .into_iter()
        .map(|(key, value)| MetadataValue { key, value })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrial {
    #[serde(default)]
    id: String,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    tick_interval: Option<u64>,
    #[serde(default)]
    length: Option<u64>,
    #[serde(default)]
    item_metadata: Option<RawItemMetadata>,
    #[serde(default)]
    system_metadata: Option<RawSystemMetadata>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawItemMetadata {
    #[serde(default)]
    avg: IndexMap<String, f64>,
    #[serde(default)]
    total: IndexMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RawSystemMetadata {
    #[serde(default)]
    min: IndexMap<String, f64>,
    #[serde(default)]
    avg: IndexMap<String, f64>,
    #[serde(default)]
    max: IndexMap<String, f64>,
}

/// The blueprint/script definition a trial was generated from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Source {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn from_payload(payload: Value) -> AnalyticsResult<Self> {
        serde_json::from_value(payload).map_err(|e| AnalyticsError::Payload(format!("source: {}", e)))
    }
}

/// Parameters for submitting a new trial run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialIngest {
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub length: u64,
    pub tick_interval: u64,
    #[serde(default)]
    pub record_items: bool,
    #[serde(default)]
    pub record_electric: bool,
    #[serde(default)]
    pub record_circuits: bool,
    #[serde(default)]
    pub record_pollution: bool,
    #[serde(default)]
    pub record_system: bool,
}
