//! Combining cell masks.

use crate::error::Result;
use raster_common::Grid;

/// Intersect two optional masks.
///
/// A cell passes the result when it is non-null in every mask that is
/// present. Returns `None` when neither mask is given.
pub fn intersect_masks(a: Option<&Grid>, b: Option<&Grid>) -> Result<Option<Grid>> {
    match (a, b) {
        (None, None) => Ok(None),
        (Some(m), None) | (None, Some(m)) => Ok(Some(m.clone())),
        (Some(a), Some(b)) => {
            b.ensure_same_region(a.region())?;
            let combined = Grid::from_fn(*a.region(), |row, col| {
                match (a.get(row, col), b.get(row, col)) {
                    (Some(_), Some(_)) => Some(1.0),
                    _ => None,
                }
            });
            Ok(Some(combined))
        }
    }
}
