use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::dataset::Dataset;

/// One record as returned by the query endpoint, keyed by upstream field name.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A detected alert, normalized from a [`RawRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub dataset: Dataset,
    pub latitude: f64,
    pub longitude: f64,
    pub recorded_at: DateTime<Utc>,
    /// Confidence label as sent by upstream (`highest`, `h`, ...).
    pub confidence_label: String,
    /// Binary score derived from the label: 1.0 for the top tiers, else 0.0.
    pub confidence: f64,
    /// Dataset-specific numeric measurements, keyed by measurement name.
    #[serde(default)]
    pub measurements: BTreeMap<String, f64>,
}

impl AlertRecord {
    pub fn measurement(&self, name: &str) -> f64 {
        self.measurements.get(name).copied().unwrap_or_default()
    }
}
