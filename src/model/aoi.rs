use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::util::time::deserialize_optional_utc;

/// Area of interest as registered on the Resource Watch API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Aoi {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: AoiAttributes,
}

impl Aoi {
    /// Geostore linked to the AOI. `None` is a terminal condition for retrieval, not an error.
    pub fn geostore_id(&self) -> Option<&str> {
        self.attributes
            .geostore
            .as_deref()
            .filter(|geostore| !geostore.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AoiAttributes {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub application: Option<String>,
    #[serde(default)]
    pub geostore: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_utc")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_optional_utc")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub datasets: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub public: bool,
    #[serde(default = "enabled")]
    pub fire_alerts: bool,
    #[serde(default = "enabled")]
    pub deforestation_alerts: bool,
    /// Remaining attributes are kept as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn enabled() -> bool {
    true
}
