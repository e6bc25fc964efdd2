//! Raster grids with a NaN null sentinel.

use crate::{RasterError, RasterResult, Region};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A raster grid: one `f32` per cell of its [`Region`], row-major,
/// north row first. `NaN` marks a null (no-data) cell.
#[derive(Debug, Clone)]
pub struct Grid {
    region: Region,
    data: Vec<f32>,
}

impl Grid {
    /// Create a grid from row-major data.
    ///
    /// `NaN` cells are null; infinite values are rejected.
    pub fn new(region: Region, data: Vec<f32>) -> RasterResult<Self> {
        if data.len() != region.len() {
            return Err(RasterError::DimensionMismatch {
                rows: region.rows,
                cols: region.cols,
                expected: region.len(),
                actual: data.len(),
            });
        }
        let grid = Self { region, data };
        grid.ensure_finite()?;
        Ok(grid)
    }

    /// A grid with every cell null.
    pub fn null(region: Region) -> Self {
        Self::filled(region, f32::NAN)
    }

    /// A grid with every cell set to `value`.
    pub fn filled(region: Region, value: f32) -> Self {
        Self {
            region,
            data: vec![value; region.len()],
        }
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    pub fn from_fn<F>(region: Region, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<f32>,
    {
        let mut data = Vec::with_capacity(region.len());
        for row in 0..region.rows {
            for col in 0..region.cols {
                data.push(f(row, col).unwrap_or(f32::NAN));
            }
        }
        Self { region, data }
    }

    /// Region this grid is laid out on.
    pub fn region(&self) -> &Region {
        &self.region
    }

    pub fn rows(&self) -> usize {
        self.region.rows
    }

    pub fn cols(&self) -> usize {
        self.region.cols
    }

    /// Raw cell data (row-major, NaN = null).
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at a cell, `None` when the cell is null or out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.region.rows || col >= self.region.cols {
            return None;
        }
        let v = self.data[self.region.flat_index(row, col)];
        if v.is_nan() {
            None
        } else {
            Some(v)
        }
    }

    /// Set a cell; `None` writes null. Out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: Option<f32>) {
        if row >= self.region.rows || col >= self.region.cols {
            return;
        }
        let idx = self.region.flat_index(row, col);
        self.data[idx] = value.unwrap_or(f32::NAN);
    }

    /// Whether the cell is null (out-of-range cells count as null).
    pub fn is_null(&self, row: usize, col: usize) -> bool {
        self.get(row, col).is_none()
    }

    /// Number of null cells.
    pub fn null_count(&self) -> usize {
        self.data.iter().filter(|v| v.is_nan()).count()
    }

    /// Number of non-null cells.
    pub fn valid_count(&self) -> usize {
        self.data.len() - self.null_count()
    }

    /// Iterate over `(row, col, value)` for every non-null cell, row-major.
    pub fn iter_valid(&self) -> impl Iterator<Item = (usize, usize, f32)> + '_ {
        let cols = self.region.cols;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .map(move |(i, v)| (i / cols, i % cols, *v))
    }

    /// Apply `f` to every cell, producing a grid on the same region.
    pub fn map<F>(&self, mut f: F) -> Grid
    where
        F: FnMut(Option<f32>) -> Option<f32>,
    {
        let data = self
            .data
            .iter()
            .map(|v| {
                let cell = if v.is_nan() { None } else { Some(*v) };
                f(cell).unwrap_or(f32::NAN)
            })
            .collect();
        Grid {
            region: self.region,
            data,
        }
    }

    /// Minimum and maximum of the non-null cells.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.iter_valid().fold(None, |acc, (_, _, v)| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Fail on the first infinite cell.
    ///
    /// Stored grids only distinguish values from nulls, so an infinity
    /// cannot be kept without turning into a null.
    pub fn ensure_finite(&self) -> RasterResult<()> {
        match self.data.iter().position(|v| v.is_infinite()) {
            Some(idx) => Err(RasterError::NonFiniteCell {
                row: idx / self.region.cols,
                col: idx % self.region.cols,
                value: self.data[idx],
            }),
            None => Ok(()),
        }
    }

    /// Fail unless `other` is laid out on the same region.
    pub fn ensure_same_region(&self, other: &Region) -> RasterResult<()> {
        if self.region.matches(other) {
            Ok(())
        } else {
            Err(RasterError::region_mismatch(format!(
                "grid is {}x{} over {:?}, expected {}x{} over {:?}",
                self.region.rows,
                self.region.cols,
                self.region.bbox,
                other.rows,
                other.cols,
                other.bbox
            )))
        }
    }
}

impl PartialEq for Grid {
    /// Cell-wise equality where two nulls compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.region == other.region
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a.is_nan() && b.is_nan()) || a == b)
    }
}

/// On-disk form of a grid: JSON has no NaN, so nulls are written as `null`.
#[derive(Serialize, Deserialize)]
struct GridDocument {
    region: Region,
    cells: Vec<Option<f32>>,
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.ensure_finite().map_err(serde::ser::Error::custom)?;
        let doc = GridDocument {
            region: self.region,
            cells: self
                .data
                .iter()
                .map(|v| if v.is_nan() { None } else { Some(*v) })
                .collect(),
        };
        doc.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let doc = GridDocument::deserialize(deserializer)?;
        doc.region.validate().map_err(serde::de::Error::custom)?;
        let data = doc
            .cells
            .into_iter()
            .map(|v| v.unwrap_or(f32::NAN))
            .collect();
        Grid::new(doc.region, data).map_err(serde::de::Error::custom)
    }
}
