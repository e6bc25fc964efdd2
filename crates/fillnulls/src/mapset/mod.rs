//! The shared namespace of named rasters and point sets.
//!
//! A mapset holds rasters, point sets and one special raster slot named
//! [`MASK`]. While `MASK` exists, mask-aware operations only consider the
//! cells where it is non-null.

mod directory;
mod memory;

pub use directory::DirectoryMapset;
pub use memory::MemoryMapset;

use raster_common::{Grid, PointSet, RasterError, RasterResult, Region};

/// Name of the mask slot.
pub const MASK: &str = "MASK";

/// Trait for a namespace of named resources sharing one region.
///
/// Implementations do not enforce any locking; one run at a time may
/// touch the `MASK` slot.
pub trait Mapset {
    /// The region every raster in this mapset is laid out on.
    fn region(&self) -> Region;

    /// Whether a raster with this name exists.
    fn raster_exists(&self, name: &str) -> bool;

    /// Read a raster.
    ///
    /// # Returns
    /// * `RasterNotFound` if no raster has that name
    fn read_raster(&self, name: &str) -> RasterResult<Grid>;

    /// Create or replace a raster. The grid's region must match
    /// [`Mapset::region`].
    fn write_raster(&mut self, name: &str, grid: &Grid) -> RasterResult<()>;

    /// Rename a raster.
    ///
    /// # Returns
    /// * `RasterNotFound` if `from` does not exist
    /// * `AlreadyExists` if `to` exists
    fn rename_raster(&mut self, from: &str, to: &str) -> RasterResult<()>;

    /// Remove a raster, returning whether it existed.
    fn remove_raster(&mut self, name: &str) -> RasterResult<bool>;

    /// Names of all rasters, sorted.
    fn raster_names(&self) -> Vec<String>;

    /// Whether a point set with this name exists.
    fn points_exist(&self, name: &str) -> bool;

    /// Read a point set.
    fn read_points(&self, name: &str) -> RasterResult<PointSet>;

    /// Create or replace a point set.
    fn write_points(&mut self, name: &str, points: &PointSet) -> RasterResult<()>;

    /// Remove a point set, returning whether it existed.
    fn remove_points(&mut self, name: &str) -> RasterResult<bool>;

    /// Names of all point sets, sorted.
    fn point_names(&self) -> Vec<String>;

    /// The active mask, if the `MASK` slot is occupied.
    fn active_mask(&self) -> RasterResult<Option<Grid>> {
        if self.raster_exists(MASK) {
            self.read_raster(MASK).map(Some)
        } else {
            Ok(None)
        }
    }
}

/// Reject names that cannot be stored as a single file.
pub(crate) fn validate_name(name: &str) -> RasterResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.chars().any(|c| c == '/' || c == '\\' || c == '\0');
    if bad {
        return Err(RasterError::InvalidName(name.to_string()));
    }
    Ok(())
}
