//! Factory functions for AOI and geostore payloads.

use serde_json::{json, Value};

/// Create an AOI record.
///
/// # Arguments
/// - `aoi_id` - The AOI id
/// - `geostore_id` - Linked geostore, `None` for an AOI without geometry
///
/// # Returns
/// - `Value` - AOI as returned by `/v2/area/{aoi_id}`
pub fn aoi(aoi_id: &str, geostore_id: Option<&str>) -> Value {
    json!({
        "type": "area",
        "id": aoi_id,
        "attributes": {
            "name": "Test Reserve",
            "application": "gfw",
            "geostore": geostore_id,
            "createdAt": "2024-06-01T10:00:00.000Z",
            "updatedAt": "2024-06-02T10:00:00.000Z",
            "datasets": [],
            "tags": [],
            "status": "saved",
            "public": false,
            "fireAlerts": true,
            "deforestationAlerts": true,
            "iso": { "country": null, "region": null }
        }
    })
}

/// GeoJSON polygon for the axis-aligned square with lower-left corner (`x`, `y`).
pub fn square(x: f64, y: f64, size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[
            [x, y],
            [x + size, y],
            [x + size, y + size],
            [x, y + size],
            [x, y]
        ]]
    })
}

/// Create a Resource Watch geostore wrapping `geometry` in a one-feature collection.
pub fn geostore(geostore_id: &str, geometry: Value) -> Value {
    json!({
        "type": "geoStore",
        "id": geostore_id,
        "attributes": {
            "geojson": {
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {},
                    "geometry": geometry
                }]
            },
            "hash": geostore_id,
            "provider": {},
            "areaHa": 1_234_567.8,
            "bbox": [],
            "lock": false,
            "info": { "use": {} }
        }
    })
}

/// Create a Data API geostore creation result.
///
/// # Arguments
/// - `geostore_id` - Id as the upstream reports it, typically in standard UUID form
/// - `geometry` - Registered geometry
pub fn created_geostore(geostore_id: &str, geometry: Value) -> Value {
    json!({
        "created_on": "2024-07-30T12:00:00.000000",
        "updated_on": "2024-07-30T12:00:00.000000",
        "gfw_geostore_id": geostore_id,
        "gfw_geojson": geometry,
        "gfw_area__ha": 12_321.0,
        "gfw_bbox": [0.0, 0.0, 1.0, 1.0]
    })
}
