//! Raster to point conversion.

use crate::error::Result;
use raster_common::{Grid, Point, PointSet};
use tracing::debug;

/// Convert every non-null cell of `grid` into a point at the cell centre.
///
/// When `mask` is given, only cells that are also non-null in the mask
/// are converted. The mask must share the grid's region.
pub fn grid_to_points(grid: &Grid, mask: Option<&Grid>) -> Result<PointSet> {
    if let Some(mask) = mask {
        mask.ensure_same_region(grid.region())?;
    }

    let region = grid.region();
    let points: PointSet = grid
        .iter_valid()
        .filter(|(row, col, _)| mask.map_or(true, |m| !m.is_null(*row, *col)))
        .map(|(row, col, value)| {
            let (x, y) = region.cell_center(row, col);
            Point::new(x, y, value as f64)
        })
        .collect();

    debug!(
        points = points.len(),
        masked = mask.is_some(),
        "Converted raster cells to points"
    );

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use raster_common::Region;

    fn region() -> Region {
        Region::with_resolution(0.0, 0.0, 1.0, 3, 3).unwrap()
    }

    #[test]
    fn test_points_at_cell_centres() {
        let mut grid = Grid::null(region());
        grid.set(0, 0, Some(5.0));
        grid.set(2, 1, Some(7.0));

        let points = grid_to_points(&grid, None).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points.points()[0], Point::new(0.5, 2.5, 5.0));
        assert_eq!(points.points()[1], Point::new(1.5, 0.5, 7.0));
    }

    #[test]
    fn test_mask_restricts_points() {
        let grid = Grid::filled(region(), 1.0);
        let mut mask = Grid::null(region());
        mask.set(1, 1, Some(1.0));

        let points = grid_to_points(&grid, Some(&mask)).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points.points()[0].x, 1.5);
        assert_eq!(points.points()[0].y, 1.5);
    }

    #[test]
    fn test_mask_region_must_match() {
        let grid = Grid::filled(region(), 1.0);
        let other = Grid::filled(Region::with_resolution(0.0, 0.0, 1.0, 4, 4).unwrap(), 1.0);
        assert!(grid_to_points(&grid, Some(&other)).is_err());
    }
}
