//! The active processing window: extent plus row/column layout.

use crate::{BoundingBox, RasterError, RasterResult};
use serde::{Deserialize, Serialize};

/// Extent and resolution of the active processing window.
///
/// Rows run north to south and columns west to east, so cell `(0, 0)` is
/// the north-west corner. Resolutions are derived from the extent and
/// the cell counts and never change once the region is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Outer edges of the window (cell edges, not cell centres).
    pub bbox: BoundingBox,
    /// Number of rows (north-south direction).
    pub rows: usize,
    /// Number of columns (east-west direction).
    pub cols: usize,
}

impl Region {
    /// Create a region, validating that it describes at least one cell of
    /// positive size.
    pub fn new(bbox: BoundingBox, rows: usize, cols: usize) -> RasterResult<Self> {
        let region = Self { bbox, rows, cols };
        region.validate()?;
        Ok(region)
    }

    /// Region whose cells are `res` units square, anchored at `(min_x, min_y)`.
    pub fn with_resolution(
        min_x: f64,
        min_y: f64,
        res: f64,
        rows: usize,
        cols: usize,
    ) -> RasterResult<Self> {
        let bbox = BoundingBox::new(
            min_x,
            min_y,
            min_x + res * cols as f64,
            min_y + res * rows as f64,
        );
        Self::new(bbox, rows, cols)
    }

    /// Check the region invariants.
    pub fn validate(&self) -> RasterResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(RasterError::InvalidRegion(format!(
                "region must have at least one cell, got {}x{}",
                self.rows, self.cols
            )));
        }
        let (w, h) = (self.bbox.width(), self.bbox.height());
        if !(w.is_finite() && h.is_finite()) || w <= 0.0 || h <= 0.0 {
            return Err(RasterError::InvalidRegion(format!(
                "extent must be finite and positive, got {} x {}",
                w, h
            )));
        }
        Ok(())
    }

    /// East-west cell size.
    pub fn ewres(&self) -> f64 {
        self.bbox.width() / self.cols as f64
    }

    /// North-south cell size.
    pub fn nsres(&self) -> f64 {
        self.bbox.height() / self.rows as f64
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if the region has no cells.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Distance used to grow the boundary ring around null areas:
    /// nominally three cells, `1.5 * (ewres + nsres)`.
    pub fn ring_distance(&self) -> f64 {
        1.5 * (self.ewres() + self.nsres())
    }

    /// Map coordinates of the centre of a cell.
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        let x = self.bbox.min_x + (col as f64 + 0.5) * self.ewres();
        let y = self.bbox.max_y - (row as f64 + 0.5) * self.nsres();
        (x, y)
    }

    /// Get the 1D array index for a 2D cell position (row-major).
    pub fn flat_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Whether two regions describe the same cell layout, within a small
    /// tolerance on the extent.
    pub fn matches(&self, other: &Region) -> bool {
        let tol = 1e-9 * (self.ewres() + self.nsres());
        self.rows == other.rows
            && self.cols == other.cols
            && (self.bbox.min_x - other.bbox.min_x).abs() <= tol
            && (self.bbox.min_y - other.bbox.min_y).abs() <= tol
            && (self.bbox.max_x - other.bbox.max_x).abs() <= tol
            && (self.bbox.max_y - other.bbox.max_y).abs() <= tol
    }
}
