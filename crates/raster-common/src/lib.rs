//! Common raster types shared across the fill-nulls workspace.
//!
//! Every grid in a processing run shares one [`Region`]: the extent and
//! the row/column layout. Cell values are `f32` with `NaN` as the null
//! sentinel, matching the convention used by the grid processor.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod points;
pub mod region;

pub use bbox::BoundingBox;
pub use error::{RasterError, RasterResult};
pub use grid::Grid;
pub use points::{Point, PointSet};
pub use region::Region;
