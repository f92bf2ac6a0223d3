use std::vec;

use geo::{
    Area, BooleanOps, BoundingRect, MultiPolygon, Polygon, Rect, SimplifyVwPreserve, Validation,
};

use crate::{
    error::partition::PartitionError,
    geometry::{grid::GridCells, repair, sizing::CellSizing},
};

/// Simplification tolerance, in degrees.
pub const SIMPLIFY_TOLERANCE: f64 = 0.0005;

/// Lazily yields the polygon fragments of an AOI, one grid cell at a time.
///
/// Finite and not restartable. Every fragment is a non-empty polygon; multi-part cell
/// intersections are yielded part by part.
pub struct Fragments {
    geometry: MultiPolygon<f64>,
    cells: GridCells,
    pending: vec::IntoIter<Polygon<f64>>,
}

impl Fragments {
    /// Number of grid cells laid over the envelope.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

impl Iterator for Fragments {
    type Item = Polygon<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(fragment) = self.pending.next() {
                return Some(fragment);
            }

            let cell = self.cells.next()?;
            let intersection = cell.to_polygon().intersection(&self.geometry);

            self.pending = intersection
                .0
                .into_iter()
                .filter(|part| !part.exterior().0.is_empty() && part.unsigned_area() > 0.0)
                .collect::<Vec<_>>()
                .into_iter();
        }
    }
}

fn valid_envelope(geometry: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    let envelope = geometry.bounding_rect()?;
    let (min, max) = (envelope.min(), envelope.max());

    let finite = [min.x, min.y, max.x, max.y].iter().all(|v| v.is_finite());
    (finite && envelope.width() > 0.0 && envelope.height() > 0.0).then_some(envelope)
}

/// Splits `geometry` into grid-bounded fragments.
///
/// The geometry is simplified (topology-preserving) and repaired if simplification left it
/// invalid, then intersected with a grid over its envelope sized per `sizing`.
///
/// # Errors
/// - [`PartitionError::NoBounds`]: the geometry is empty or degenerate
/// - [`PartitionError::InvalidCellSize`]: the chosen cell size is not finite and positive,
///   or is too small for the grid's cell count to be represented
pub fn partition(
    geometry: &MultiPolygon<f64>,
    sizing: CellSizing,
) -> Result<Fragments, PartitionError> {
    let mut simplified =
        geometry.simplify_vw_preserve(&(SIMPLIFY_TOLERANCE * SIMPLIFY_TOLERANCE));
    if !simplified.is_valid() {
        tracing::debug!("Simplified geometry is invalid, repairing");
        simplified = repair(&simplified);
    }

    let Some(envelope) = valid_envelope(&simplified) else {
        tracing::error!("Geometry collection has no bounds");
        return Err(PartitionError::NoBounds);
    };

    let cell_size = sizing.cell_size(&simplified, &envelope);
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(PartitionError::InvalidCellSize(cell_size));
    }

    let Some(cells) = GridCells::new(envelope, cell_size) else {
        tracing::error!("Cell size {} yields too many grid cells", cell_size);
        return Err(PartitionError::InvalidCellSize(cell_size));
    };
    tracing::debug!(
        "Partitioning geometry into up to {} cells of {} degrees",
        cells.len(),
        cell_size
    );

    Ok(Fragments {
        geometry: simplified,
        cells,
        pending: Vec::new().into_iter(),
    })
}
