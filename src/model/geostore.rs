use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::util::time::deserialize_utc;

/// Strips hyphens and lowercases a geostore id.
///
/// Geostore ids come back in standard UUID form, but the query endpoint expects the compact
/// hex form.
pub fn normalize_geostore_id(id: &str) -> String {
    id.replace('-', "").to_lowercase()
}

fn deserialize_geostore_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(normalize_geostore_id(&raw))
}

/// Geometry registered on the Resource Watch API, as linked from an AOI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Geostore {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub attributes: GeostoreAttributes,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeostoreAttributes {
    pub geojson: geojson::GeoJson,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub area_ha: f64,
    #[serde(default)]
    pub bbox: Vec<f64>,
    #[serde(default)]
    pub lock: bool,
    #[serde(default)]
    pub provider: serde_json::Value,
    #[serde(default)]
    pub info: serde_json::Value,
}

/// Geostore registered on the Data API from a geometry fragment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedGeostore {
    #[serde(deserialize_with = "deserialize_utc")]
    pub created_on: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_utc")]
    pub updated_on: DateTime<Utc>,
    /// Compact (hyphen-free, lowercase) form, ready for use as a query parameter.
    #[serde(deserialize_with = "deserialize_geostore_id")]
    pub gfw_geostore_id: String,
    pub gfw_geojson: geojson::Geometry,
    #[serde(rename = "gfw_area__ha", default)]
    pub gfw_area_ha: f64,
    #[serde(default)]
    pub gfw_bbox: Vec<f64>,
}
