use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    model::confidence::{FIRE_CONFIDENCE_ORDER, INTEGRATED_CONFIDENCE_ORDER},
    util::time::{deserialize_optional_utc, deserialize_utc},
};

/// Alert datasets this crate knows how to query and normalize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dataset {
    #[serde(rename = "gfw_integrated_alerts")]
    IntegratedAlerts,
    #[serde(rename = "nasa_viirs_fire_alerts")]
    NasaViirsFireAlerts,
}

impl Dataset {
    /// Upstream dataset name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IntegratedAlerts => "gfw_integrated_alerts",
            Self::NasaViirsFireAlerts => "nasa_viirs_fire_alerts",
        }
    }

    /// Column the date-range bound is applied to.
    pub const fn date_field(&self) -> &'static str {
        match self {
            Self::IntegratedAlerts => "gfw_integrated_alerts__date",
            Self::NasaViirsFireAlerts => "alert__date",
        }
    }

    /// Column holding the confidence label.
    pub const fn confidence_field(&self) -> &'static str {
        match self {
            Self::IntegratedAlerts => "gfw_integrated_alerts__confidence",
            Self::NasaViirsFireAlerts => "confidence__cat",
        }
    }

    /// Fields requested from the query endpoint, latitude and longitude aside.
    pub const fn query_fields(&self) -> &'static [&'static str] {
        match self {
            Self::IntegratedAlerts => &[
                "gfw_integrated_alerts__date",
                "gfw_integrated_alerts__confidence",
            ],
            Self::NasaViirsFireAlerts => &["confidence__cat", "alert__date"],
        }
    }

    /// Ordered confidence levels, low to high.
    pub const fn confidence_order(&self) -> &'static [&'static str] {
        match self {
            Self::IntegratedAlerts => INTEGRATED_CONFIDENCE_ORDER,
            Self::NasaViirsFireAlerts => FIRE_CONFIDENCE_ORDER,
        }
    }

    /// Value a confidence level takes in the filter expression.
    ///
    /// The fire dataset stores single-letter category codes.
    pub fn confidence_filter_value(&self, level: &str) -> String {
        match self {
            Self::IntegratedAlerts => level.to_string(),
            Self::NasaViirsFireAlerts => level.to_lowercase().chars().take(1).collect(),
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptive metadata nested in some dataset responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatasetDescriptor {
    #[serde(default)]
    pub update_frequency: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub resolution: Option<i64>,
    #[serde(default)]
    pub geographic_coverage: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Dataset version descriptor, the unit of freshness.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetMetadata {
    #[serde(deserialize_with = "deserialize_utc")]
    pub created_on: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_utc")]
    pub updated_on: DateTime<Utc>,
    pub dataset: String,
    pub version: String,
    #[serde(default)]
    pub is_latest: bool,
    #[serde(default)]
    pub is_mutable: bool,
    #[serde(default)]
    update_frequency: Option<String>,
    #[serde(default)]
    pub metadata: Option<DatasetDescriptor>,
}

impl DatasetMetadata {
    /// Declared update cadence, if any ("daily", "weekly", "monthly", ...).
    pub fn update_frequency(&self) -> Option<&str> {
        self.update_frequency.as_deref().or_else(|| {
            self.metadata
                .as_ref()
                .and_then(|descriptor| descriptor.update_frequency.as_deref())
        })
    }
}

fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or_default()
}

/// Last-seen freshness marker for one dataset, persisted per integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetStatus {
    #[serde(default = "epoch")]
    pub latest_updated_on: DateTime<Utc>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub dataset: String,
}

impl DatasetStatus {
    /// A marker that has never seen the dataset.
    pub fn unseen(dataset: &str, version: &str) -> Self {
        Self {
            latest_updated_on: epoch(),
            version: version.to_string(),
            dataset: dataset.to_string(),
        }
    }

    pub fn from_metadata(metadata: &DatasetMetadata) -> Self {
        Self {
            latest_updated_on: metadata.updated_on,
            version: metadata.version.clone(),
            dataset: metadata.dataset.clone(),
        }
    }

    /// Whether upstream reports a change since this marker was recorded.
    pub fn has_updates(&self, metadata: &DatasetMetadata) -> bool {
        metadata.updated_on > self.latest_updated_on
    }
}

/// One column of a dataset version.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetField {
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub description: serde_json::Value,
    pub data_type: String,
    #[serde(default)]
    pub unit: serde_json::Value,
    #[serde(default)]
    pub is_feature_info: bool,
    #[serde(default)]
    pub is_filter: bool,
}

/// Entry of the dataset listing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DatasetSummary {
    pub dataset: String,
    #[serde(default, deserialize_with = "deserialize_optional_utc")]
    pub updated_on: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_downloadable: bool,
    #[serde(default)]
    pub versions: Vec<String>,
    #[serde(default)]
    pub metadata: Option<DatasetDescriptor>,
}
