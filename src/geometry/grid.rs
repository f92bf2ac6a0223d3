use geo::{coord, Rect};

/// Square cells of side `interval` laid over an envelope, columns outermost.
///
/// The last column and row are clipped to the envelope edge. Cell corners are computed from
/// their index rather than by repeated addition so the grid does not drift.
#[derive(Debug, Clone)]
pub struct GridCells {
    envelope: Rect<f64>,
    interval: f64,
    cols: usize,
    rows: usize,
    next: usize,
}

/// Cells needed to cover `extent`, absorbing float noise at exact multiples.
///
/// `None` when the count does not fit in a `usize`.
fn cell_count(extent: f64, interval: f64) -> Option<usize> {
    let count = ((extent / interval) - 1e-9).ceil().max(1.0);
    (count.is_finite() && count < usize::MAX as f64).then_some(count as usize)
}

impl GridCells {
    /// Grid over `envelope`, or `None` if `interval` is so small the cell count overflows.
    pub fn new(envelope: Rect<f64>, interval: f64) -> Option<Self> {
        let cols = cell_count(envelope.width(), interval)?;
        let rows = cell_count(envelope.height(), interval)?;
        cols.checked_mul(rows)?;

        Some(Self {
            envelope,
            interval,
            cols,
            rows,
            next: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.cols * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for GridCells {
    type Item = Rect<f64>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.len() {
            return None;
        }

        let col = self.next / self.rows;
        let row = self.next % self.rows;
        self.next += 1;

        let min = self.envelope.min();
        let max = self.envelope.max();
        let x0 = min.x + col as f64 * self.interval;
        let y0 = min.y + row as f64 * self.interval;

        Some(Rect::new(
            coord! { x: x0, y: y0 },
            coord! { x: (x0 + self.interval).min(max.x), y: (y0 + self.interval).min(max.y) },
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len().saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}
