//! In-memory mapset.

use std::collections::HashMap;

use raster_common::{Grid, PointSet, RasterError, RasterResult, Region};

use super::{validate_name, Mapset};

/// Mapset kept entirely in memory.
#[derive(Debug, Clone)]
pub struct MemoryMapset {
    region: Region,
    rasters: HashMap<String, Grid>,
    points: HashMap<String, PointSet>,
}

impl MemoryMapset {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            rasters: HashMap::new(),
            points: HashMap::new(),
        }
    }

    /// Builder-style raster insertion.
    pub fn with_raster(mut self, name: &str, grid: Grid) -> RasterResult<Self> {
        self.write_raster(name, &grid)?;
        Ok(self)
    }
}

impl Mapset for MemoryMapset {
    fn region(&self) -> Region {
        self.region
    }

    fn raster_exists(&self, name: &str) -> bool {
        self.rasters.contains_key(name)
    }

    fn read_raster(&self, name: &str) -> RasterResult<Grid> {
        self.rasters
            .get(name)
            .cloned()
            .ok_or_else(|| RasterError::RasterNotFound(name.to_string()))
    }

    fn write_raster(&mut self, name: &str, grid: &Grid) -> RasterResult<()> {
        validate_name(name)?;
        grid.ensure_same_region(&self.region)?;
        grid.ensure_finite()?;
        self.rasters.insert(name.to_string(), grid.clone());
        Ok(())
    }

    fn rename_raster(&mut self, from: &str, to: &str) -> RasterResult<()> {
        validate_name(to)?;
        if self.rasters.contains_key(to) {
            return Err(RasterError::AlreadyExists(to.to_string()));
        }
        let grid = self
            .rasters
            .remove(from)
            .ok_or_else(|| RasterError::RasterNotFound(from.to_string()))?;
        self.rasters.insert(to.to_string(), grid);
        Ok(())
    }

    fn remove_raster(&mut self, name: &str) -> RasterResult<bool> {
        Ok(self.rasters.remove(name).is_some())
    }

    fn raster_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.rasters.keys().cloned().collect();
        names.sort();
        names
    }

    fn points_exist(&self, name: &str) -> bool {
        self.points.contains_key(name)
    }

    fn read_points(&self, name: &str) -> RasterResult<PointSet> {
        self.points
            .get(name)
            .cloned()
            .ok_or_else(|| RasterError::PointsNotFound(name.to_string()))
    }

    fn write_points(&mut self, name: &str, points: &PointSet) -> RasterResult<()> {
        validate_name(name)?;
        self.points.insert(name.to_string(), points.clone());
        Ok(())
    }

    fn remove_points(&mut self, name: &str) -> RasterResult<bool> {
        Ok(self.points.remove(name).is_some())
    }

    fn point_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.points.keys().cloned().collect();
        names.sort();
        names
    }
}
