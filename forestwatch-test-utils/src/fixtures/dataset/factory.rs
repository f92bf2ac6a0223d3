//! Factory functions for dataset metadata and alert records.

use serde_json::{json, Value};

/// Create a dataset version descriptor.
///
/// # Arguments
/// - `dataset` - Dataset name
/// - `version` - Version name, usually `"latest"` or `"vYYYYMMDD"`
/// - `updated_on` - Upstream update timestamp
/// - `update_frequency` - Declared cadence, placed under the nested `metadata` object
///
/// # Returns
/// - `Value` - Metadata as returned by `/dataset/{dataset}/{version}`
pub fn dataset_metadata(
    dataset: &str,
    version: &str,
    updated_on: &str,
    update_frequency: Option<&str>,
) -> Value {
    json!({
        "created_on": "2021-09-14T08:00:00.000Z",
        "updated_on": updated_on,
        "dataset": dataset,
        "version": version,
        "is_latest": true,
        "is_mutable": false,
        "metadata": {
            "title": dataset,
            "update_frequency": update_frequency
        }
    })
}

/// Create a raw integrated deforestation alert row.
pub fn integrated_alert(latitude: f64, longitude: f64, date: &str, confidence: &str) -> Value {
    json!({
        "latitude": latitude,
        "longitude": longitude,
        "gfw_integrated_alerts__date": date,
        "gfw_integrated_alerts__confidence": confidence
    })
}

/// Create a raw VIIRS fire alert row.
///
/// # Arguments
/// - `confidence` - Single-letter category code (`"l"`, `"n"` or `"h"`)
/// - `frp` - Fire radiative power in megawatts
pub fn fire_alert(latitude: f64, longitude: f64, date: &str, confidence: &str, frp: f64) -> Value {
    json!({
        "latitude": latitude,
        "longitude": longitude,
        "alert__date": date,
        "confidence__cat": confidence,
        "frp__MW": frp,
        "bright_ti4__K": 330.5,
        "bright_ti5__K": 290.1
    })
}

pub fn dataset_field(name: &str, data_type: &str) -> Value {
    json!({
        "name": name,
        "alias": name,
        "description": null,
        "data_type": data_type,
        "unit": null,
        "is_feature_info": true,
        "is_filter": true
    })
}

pub fn dataset_summary(dataset: &str, versions: &[&str]) -> Value {
    json!({
        "dataset": dataset,
        "updated_on": "2024-07-30T06:00:00",
        "is_downloadable": true,
        "versions": versions,
        "metadata": { "title": dataset }
    })
}
