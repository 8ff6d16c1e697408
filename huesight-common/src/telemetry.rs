use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tag set of a metric record (tag name to tag value).
pub type Tags = BTreeMap<String, String>;

/// Field set of a metric record (field name to value).
pub type Fields = BTreeMap<String, FieldValue>;

/// A single metric record emitted by a bridge.
///
/// Mirrors the line-protocol shape used by metrics collectors: one
/// measurement name, a set of string tags and a set of numeric fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    /// Unix epoch milliseconds at emission time.
    pub timestamp: i64,

    /// Measurement name (e.g., "huebridge_light").
    pub measurement: String,

    /// Identifying tags (bridge URL, device, room).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Tags,

    /// Measured values.
    pub fields: Fields,
}

impl MetricRecord {
    /// Create a record stamped with the current time.
    pub fn new(measurement: impl Into<String>, fields: Fields, tags: Tags) -> Self {
        Self {
            timestamp: current_timestamp_millis(),
            measurement: measurement.into(),
            tags,
            fields,
        }
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

/// Typed field value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
}

impl FieldValue {
    /// Numeric value as `f64` regardless of the variant.
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Integer(v) => *v as f64,
            FieldValue::Float(v) => *v,
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

/// Booleans are carried as 1/0 integers.
impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Integer(i64::from(v))
    }
}

/// Get the current timestamp in milliseconds since Unix epoch.
pub fn current_timestamp_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
