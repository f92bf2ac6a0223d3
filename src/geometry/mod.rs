//! Adaptive partitioning of AOI geometries into bounded-size query cells.
//!
//! An AOI's GeoJSON is flattened into one [`MultiPolygon`], then [`partition::partition`]
//! lays a grid over it and yields the per-cell intersections lazily. [`sizing`] chooses the
//! grid cell size: fixed, banded by AOI area, or capped by a maximum fragment count.

pub mod grid;
pub mod partition;
pub mod sizing;

use geo::{BooleanOps, MultiPolygon, Polygon};
use geojson::GeoJson;

use crate::error::Error;

pub use partition::{partition, Fragments};
pub use sizing::CellSizing;

/// Rebuilds a geometry by unioning its parts, resolving overlaps between them.
pub fn repair(geometry: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geometry
        .0
        .iter()
        .fold(MultiPolygon::new(Vec::new()), |merged, polygon| {
            merged.union(polygon)
        })
}

fn collect_polygons(geometry: geo::Geometry<f64>, polygons: &mut Vec<Polygon<f64>>) {
    match geometry {
        geo::Geometry::Polygon(polygon) => polygons.push(polygon),
        geo::Geometry::MultiPolygon(multi) => polygons.extend(multi.0),
        geo::Geometry::Rect(rect) => polygons.push(rect.to_polygon()),
        geo::Geometry::Triangle(triangle) => polygons.push(triangle.to_polygon()),
        geo::Geometry::GeometryCollection(collection) => {
            for member in collection.0 {
                collect_polygons(member, polygons);
            }
        }
        other => tracing::debug!("Ignoring non-areal geometry {:?}", other),
    }
}

fn convert(geometry: &geojson::Geometry, polygons: &mut Vec<Polygon<f64>>) -> Result<(), Error> {
    let geometry = geo::Geometry::<f64>::try_from(geometry.value.clone())
        .map_err(|e| Error::Geometry(e.to_string()))?;
    collect_polygons(geometry, polygons);
    Ok(())
}

/// Flattens every areal geometry in `geojson` (features, collections, bare geometries) into
/// one repaired [`MultiPolygon`]. Points and lines are ignored.
pub fn multipolygon_from_geojson(geojson: &GeoJson) -> Result<MultiPolygon<f64>, Error> {
    let mut polygons = Vec::new();

    match geojson {
        GeoJson::FeatureCollection(collection) => {
            for geometry in collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
                convert(geometry, &mut polygons)?;
            }
        }
        GeoJson::Feature(feature) => {
            if let Some(geometry) = &feature.geometry {
                convert(geometry, &mut polygons)?;
            }
        }
        GeoJson::Geometry(geometry) => convert(geometry, &mut polygons)?,
    }

    Ok(repair(&MultiPolygon::new(polygons)))
}

/// GeoJSON geometry for registering a fragment upstream.
pub fn polygon_to_geojson(polygon: &Polygon<f64>) -> geojson::Geometry {
    geojson::Geometry::new(geojson::Value::from(polygon))
}
