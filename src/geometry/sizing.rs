use geo::{Area, MultiPolygon, Rect};

/// Approximate hectares in one square degree (111 km x 111 km).
pub const DEGREES_SQ_TO_HECTARES: f64 = 1_232_100.0;

/// Grid cell size used when nothing else is configured.
pub const DEFAULT_CELL_SIZE_DEGREES: f64 = 1.0;

/// Bounds applied to the cell size derived from a partition cap.
pub const MIN_CAPPED_CELL_SIZE: f64 = 0.1;
pub const MAX_CAPPED_CELL_SIZE: f64 = 2.0;

/// How the grid cell size is chosen for an AOI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellSizing {
    /// Always this many degrees.
    Fixed(f64),
    /// `base` scaled by the AOI's area band: small AOIs get coarser cells, large ones finer.
    AreaAware { base: f64 },
    /// Whatever size keeps the grid at roughly `max_partitions` cells.
    Capped { max_partitions: usize },
}

impl Default for CellSizing {
    fn default() -> Self {
        Self::Fixed(DEFAULT_CELL_SIZE_DEGREES)
    }
}

impl CellSizing {
    pub fn cell_size(&self, geometry: &MultiPolygon<f64>, envelope: &Rect<f64>) -> f64 {
        match *self {
            Self::Fixed(size) => size,
            Self::AreaAware { base } => area_aware_cell_size(geometry.unsigned_area(), base),
            Self::Capped { max_partitions } => {
                capped_cell_size(envelope.width() * envelope.height(), max_partitions)
            }
        }
    }
}

pub fn hectares(area_degrees_sq: f64) -> f64 {
    area_degrees_sq * DEGREES_SQ_TO_HECTARES
}

/// Banded cell size: under 1,000 ha 2x `base`, under 10,000 ha 1.5x, under 100,000 ha
/// unchanged, above that 0.5x.
pub fn area_aware_cell_size(area_degrees_sq: f64, base: f64) -> f64 {
    let area_ha = hectares(area_degrees_sq);

    let factor = if area_ha < 1_000.0 {
        2.0
    } else if area_ha < 10_000.0 {
        1.5
    } else if area_ha < 100_000.0 {
        1.0
    } else {
        0.5
    };

    base * factor
}

/// Cell size whose square is the area per partition, clamped to a usable range.
pub fn capped_cell_size(area_degrees_sq: f64, max_partitions: usize) -> f64 {
    let target_area = area_degrees_sq / max_partitions.max(1) as f64;
    target_area
        .sqrt()
        .clamp(MIN_CAPPED_CELL_SIZE, MAX_CAPPED_CELL_SIZE)
}
