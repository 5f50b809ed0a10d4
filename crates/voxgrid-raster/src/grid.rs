//! The per-layer boolean pixel grid.

/// A fixed-size 2D boolean grid for one layer, indexed by (y, x).
///
/// The grid is caller-owned; the voxelizer mutates it through an
/// exclusive reference and never resizes it. All writes are
/// bounds-checked here: coordinates outside the grid are silently
/// discarded, so sweep code never writes out of bounds regardless of
/// the input geometry.
#[derive(Debug, Clone)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl PixelGrid {
    /// Create an unfilled grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Grid width (sweep x-range is `0..width`).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell value at `(x, y)`; coordinates outside the grid read as unfilled.
    pub fn get(&self, x: i64, y: i64) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        self.cells[y as usize * self.width + x as usize]
    }

    /// Mark the cell at `(x, y)` filled. Out-of-bounds coordinates are ignored.
    pub fn set(&mut self, x: i64, y: i64) {
        if self.in_bounds(x, y) {
            self.cells[y as usize * self.width + x as usize] = true;
        }
    }

    /// Fill the inclusive row span `y0..=y1` at column `x`, clamped to bounds.
    pub fn fill_column(&mut self, x: i64, y0: i64, y1: i64) {
        if x < 0 || x >= self.width as i64 || self.height == 0 {
            return;
        }
        let lo = y0.max(0);
        let hi = y1.min(self.height as i64 - 1);
        for y in lo..=hi {
            self.cells[y as usize * self.width + x as usize] = true;
        }
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// No cell is filled.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| !c)
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}
