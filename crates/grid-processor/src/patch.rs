//! Merging grids cell by cell.

use crate::error::{GridProcessorError, Result};
use raster_common::Grid;
use tracing::debug;

/// Merge grids so that each cell takes the first non-null value in input
/// order. A cell that is null in every input stays null.
///
/// All inputs must share the first grid's region.
pub fn patch(inputs: &[&Grid]) -> Result<Grid> {
    let (first, rest) = inputs
        .split_first()
        .ok_or_else(|| GridProcessorError::invalid_parameter("patch needs at least one input"))?;

    for grid in rest {
        grid.ensure_same_region(first.region())?;
    }

    let mut out = (*first).clone();
    let mut taken = 0usize;
    for grid in rest {
        for (row, col, value) in grid.iter_valid() {
            if out.is_null(row, col) {
                out.set(row, col, Some(value));
                taken += 1;
            }
        }
    }

    debug!(
        inputs = inputs.len(),
        cells_from_later_inputs = taken,
        "Patched grids"
    );

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::Region;

    fn region() -> Region {
        Region::with_resolution(0.0, 0.0, 1.0, 2, 2).unwrap()
    }

    #[test]
    fn test_first_input_wins() {
        let mut a = Grid::null(region());
        a.set(0, 0, Some(1.0));
        let b = Grid::filled(region(), 9.0);

        let out = patch(&[&a, &b]).unwrap();
        assert_eq!(out.get(0, 0), Some(1.0));
        assert_eq!(out.get(0, 1), Some(9.0));
        assert_eq!(out.get(1, 1), Some(9.0));
    }

    #[test]
    fn test_null_everywhere_stays_null() {
        let a = Grid::null(region());
        let mut b = Grid::null(region());
        b.set(1, 0, Some(3.0));

        let out = patch(&[&a, &b]).unwrap();
        assert_eq!(out.null_count(), 3);
        assert_eq!(out.get(1, 0), Some(3.0));
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(patch(&[]).is_err());
    }

    #[test]
    fn test_region_mismatch_is_rejected() {
        let a = Grid::null(region());
        let b = Grid::null(Region::with_resolution(0.0, 0.0, 1.0, 3, 3).unwrap());
        assert!(patch(&[&a, &b]).is_err());
    }
}
